#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use urania::ephemeris::{EphemerisProvider, Position};
use urania::{Body, Result, UraniaError};

/// Bodies moving at constant speed from a longitude at JD 0.
#[derive(Default)]
pub struct LinearEphemeris {
    motions: BTreeMap<Body, (f64, f64)>,
}

impl LinearEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, body: Body, longitude_at_zero: f64, speed: f64) -> Self {
        self.motions.insert(body, (longitude_at_zero, speed));
        self
    }
}

impl EphemerisProvider for LinearEphemeris {
    fn position(&self, body: Body, jd: f64) -> Result<Position> {
        let (lon0, speed) = self.motions.get(&body).ok_or(UraniaError::UnknownBody {
            id: body.id().to_string(),
        })?;
        Ok(Position::new(lon0 + speed * jd, *speed))
    }
}

/// Oscillating motion: `center + amplitude * sin(2π t / period)`, which
/// turns retrograde half of each period.
pub struct OscillatingEphemeris {
    pub body: Body,
    pub center: f64,
    pub amplitude: f64,
    pub period: f64,
}

impl EphemerisProvider for OscillatingEphemeris {
    fn position(&self, body: Body, jd: f64) -> Result<Position> {
        if body != self.body {
            return Err(UraniaError::UnknownBody {
                id: body.id().to_string(),
            });
        }
        let w = std::f64::consts::TAU / self.period;
        let longitude = self.center + self.amplitude * (w * jd).sin();
        let speed = self.amplitude * w * (w * jd).cos();
        Ok(Position::new(longitude, speed))
    }
}

/// Wraps a provider and fails for every whole day listed.
pub struct FailingDays<P> {
    pub inner: P,
    pub failing: HashSet<i64>,
}

impl<P: EphemerisProvider> EphemerisProvider for FailingDays<P> {
    fn position(&self, body: Body, jd: f64) -> Result<Position> {
        if self.failing.contains(&(jd.floor() as i64)) {
            return Err(UraniaError::CalculationFailed {
                body: body.id().to_string(),
                jd,
                message: "scripted failure".to_string(),
            });
        }
        self.inner.position(body, jd)
    }
}

pub fn positions(entries: &[(Body, f64, f64)]) -> BTreeMap<Body, Position> {
    entries
        .iter()
        .map(|&(body, lon, speed)| (body, Position::new(lon, speed)))
        .collect()
}
