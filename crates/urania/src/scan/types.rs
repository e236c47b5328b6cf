use crate::angles::ZodiacSign;
use crate::bodies::Body;
use crate::ephemeris::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything with a timestamp can be scanned.
pub trait TimedSample {
    fn instant(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EclipseKind {
    SolarTotal,
    SolarAnnular,
    SolarHybrid,
    SolarPartial,
    LunarTotal,
    LunarPartial,
    LunarPenumbral,
}

impl EclipseKind {
    pub fn is_solar(self) -> bool {
        matches!(
            self,
            EclipseKind::SolarTotal
                | EclipseKind::SolarAnnular
                | EclipseKind::SolarHybrid
                | EclipseKind::SolarPartial
        )
    }
}

/// An eclipse recorded against a stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipseEvent {
    pub kind: EclipseKind,
    /// Longitude of the eclipsed luminary.
    pub longitude: f64,
}

impl EclipseEvent {
    pub fn sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.longitude)
    }
}

/// Body positions at one instant, from a fixed-step series or a stored
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSample {
    pub instant: DateTime<Utc>,
    pub positions: BTreeMap<Body, Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eclipse: Option<EclipseEvent>,
}

impl ChartSample {
    pub fn new(instant: DateTime<Utc>, positions: BTreeMap<Body, Position>) -> Self {
        Self {
            instant,
            positions,
            eclipse: None,
        }
    }

    pub fn with_eclipse(mut self, eclipse: EclipseEvent) -> Self {
        self.eclipse = Some(eclipse);
        self
    }

    pub fn position(&self, body: Body) -> Option<&Position> {
        self.positions.get(&body).filter(|p| p.is_valid())
    }
}

impl TimedSample for ChartSample {
    fn instant(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// A maximal run of matching samples with no gap wider than the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Index of the first matching sample in the scanned slice.
    pub start_sample: usize,
    /// Index of the last matching sample in the scanned slice.
    pub end_sample: usize,
    pub match_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScanResult {
    pub ranges: Vec<DateRange>,
    pub total_matches: usize,
    pub range_count: usize,
}
