pub mod calculator;
pub mod graph;
pub mod types;

pub use calculator::{applying_state, compute_aspects, find_aspect, match_aspect, AspectCalculator};
pub use graph::AspectGraph;
pub use types::{
    AspectDefinition, AspectInstance, AspectKind, OrbConfig, TieBreak, ASPECT_TABLE,
};
