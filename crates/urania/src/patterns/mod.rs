pub mod detector;
pub mod types;

pub use detector::{
    detect_patterns, find_grand_crosses, find_grand_trines, find_kites, find_t_squares, find_yods,
};
pub use types::{
    GrandCross, GrandTrine, Kite, Pattern, PatternKind, PatternSet, PatternSummary, TSquare, Yod,
};
