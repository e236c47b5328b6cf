use crate::ephemeris::Position;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An instant at which a body reaches a target longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExactHit {
    /// Julian Day (UT) of the crossing.
    pub jd: f64,
    /// Remaining distance to the target in degrees, close to zero.
    pub orb: f64,
    /// Position of the body at `jd`.
    pub position: Position,
    /// The longitude that was crossed.
    pub target_longitude: f64,
}

impl ExactHit {
    pub fn instant(&self) -> Result<DateTime<Utc>> {
        crate::time::julian_day_to_datetime(self.jd)
    }
}
