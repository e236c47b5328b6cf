use crate::bodies::Body;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Ecliptic longitude and longitude speed of a body at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Speed in longitude (degrees per day), negative while retrograde
    pub speed: f64,
}

impl Position {
    pub fn new(longitude: f64, speed: f64) -> Self {
        Self {
            longitude: crate::angles::normalize(longitude),
            speed,
        }
    }

    pub fn is_retrograde(&self) -> bool {
        self.speed < 0.0
    }

    /// Positions with non-finite components are excluded from aspect and
    /// pattern work.
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite() && self.speed.is_finite()
    }
}

/// Source of body positions for a continuous time value (Julian Day, UT).
///
/// Implementations are treated as pure but potentially expensive; searches
/// call them sequentially and never cache.
pub trait EphemerisProvider {
    fn position(&self, body: Body, jd: f64) -> Result<Position>;
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for &P {
    fn position(&self, body: Body, jd: f64) -> Result<Position> {
        (**self).position(body, jd)
    }
}

impl<P: EphemerisProvider + ?Sized> EphemerisProvider for Box<P> {
    fn position(&self, body: Body, jd: f64) -> Result<Position> {
        (**self).position(body, jd)
    }
}

/// Adapts a closure into a provider, mostly for synthetic motion in tests
/// and benches.
pub struct FnEphemeris<F>(pub F);

impl<F> FnEphemeris<F>
where
    F: Fn(Body, f64) -> Result<Position>,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> EphemerisProvider for FnEphemeris<F>
where
    F: Fn(Body, f64) -> Result<Position>,
{
    fn position(&self, body: Body, jd: f64) -> Result<Position> {
        (self.0)(body, jd)
    }
}

/// Settings handed to an ephemeris backend at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EphemerisConfig {
    /// Directory holding the ephemeris data files. Falls back to
    /// `SWISS_EPHEMERIS_PATH`, then `/usr/local/share/swisseph`.
    pub path: Option<PathBuf>,
}

/// Positions of several bodies at one instant, keyed in body order.
pub fn snapshot<P: EphemerisProvider + ?Sized>(
    provider: &P,
    bodies: &[Body],
    jd: f64,
) -> Result<BTreeMap<Body, Position>> {
    let mut positions = BTreeMap::new();
    for &body in bodies {
        positions.insert(body, provider.position(body, jd)?);
    }
    Ok(positions)
}
