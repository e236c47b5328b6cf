pub mod adapter;
pub mod types;

pub use adapter::SwissEphemerisAdapter;
pub use types::{snapshot, EphemerisConfig, EphemerisProvider, FnEphemeris, Position};
