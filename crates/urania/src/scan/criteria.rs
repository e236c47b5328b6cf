use crate::angles::{in_arc, shortest_arc, ZodiacSign};
use crate::aspects::AspectKind;
use crate::bodies::Body;
use crate::scan::types::{ChartSample, EclipseKind};
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_GAP_HOURS: i64 = 72;
pub const ECLIPSE_MAX_GAP_HOURS: i64 = 24;

/// One condition tested against a sample. A body missing from the sample
/// never matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criterion {
    /// Longitude within the forward arc `from..=to`, wrapping through 0°
    /// when `from > to`.
    LongitudeRange { body: Body, from: f64, to: f64 },
    InSign { body: Body, sign: ZodiacSign },
    Aspect {
        a: Body,
        b: Body,
        kind: AspectKind,
        orb: f64,
    },
    Retrograde { body: Body },
    /// An eclipse on the sample, optionally of one kind and in one sign.
    Eclipse {
        kind: Option<EclipseKind>,
        sign: Option<ZodiacSign>,
    },
}

impl Criterion {
    pub fn matches(&self, sample: &ChartSample) -> bool {
        match *self {
            Criterion::LongitudeRange { body, from, to } => sample
                .position(body)
                .is_some_and(|p| in_arc(p.longitude, from, to)),
            Criterion::InSign { body, sign } => sample
                .position(body)
                .is_some_and(|p| ZodiacSign::from_longitude(p.longitude) == sign),
            Criterion::Aspect { a, b, kind, orb } => {
                match (sample.position(a), sample.position(b)) {
                    (Some(pa), Some(pb)) => {
                        (shortest_arc(pa.longitude, pb.longitude) - kind.angle()).abs() <= orb
                    }
                    _ => false,
                }
            }
            Criterion::Retrograde { body } => {
                sample.position(body).is_some_and(|p| p.is_retrograde())
            }
            Criterion::Eclipse { kind, sign } => sample.eclipse.is_some_and(|eclipse| {
                kind.map_or(true, |k| eclipse.kind == k)
                    && sign.map_or(true, |s| eclipse.sign() == s)
            }),
        }
    }

    pub fn is_eclipse(&self) -> bool {
        matches!(self, Criterion::Eclipse { .. })
    }
}

/// Conditions that must all hold, plus the gap used to join matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCriteria {
    pub criteria: Vec<Criterion>,
    pub max_gap: Duration,
}

impl ScanCriteria {
    /// Gap defaults to 24 hours when any eclipse condition is present,
    /// 72 hours otherwise.
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self::with_gaps(
            criteria,
            Duration::hours(DEFAULT_MAX_GAP_HOURS),
            Duration::hours(ECLIPSE_MAX_GAP_HOURS),
        )
    }

    /// Like [`ScanCriteria::new`] with caller-chosen gaps.
    pub fn with_gaps(criteria: Vec<Criterion>, max_gap: Duration, eclipse_gap: Duration) -> Self {
        let max_gap = if criteria.iter().any(Criterion::is_eclipse) {
            eclipse_gap
        } else {
            max_gap
        };
        Self { criteria, max_gap }
    }

    /// An empty criteria list matches nothing.
    pub fn matches(&self, sample: &ChartSample) -> bool {
        !self.criteria.is_empty() && self.criteria.iter().all(|c| c.matches(sample))
    }
}
