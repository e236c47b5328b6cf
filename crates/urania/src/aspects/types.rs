use crate::bodies::Body;
use crate::error::UraniaError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Aspect kinds in ascending angle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Semisextile,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

impl AspectKind {
    pub fn definition(self) -> &'static AspectDefinition {
        &ASPECT_TABLE[self as usize]
    }

    pub fn angle(self) -> f64 {
        self.definition().angle
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn is_major(self) -> bool {
        self.definition().is_major
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AspectKind {
    type Err = UraniaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let kind = match lower.as_str() {
            "conjunction" => AspectKind::Conjunction,
            "semisextile" | "semi_sextile" => AspectKind::Semisextile,
            "sextile" => AspectKind::Sextile,
            "square" => AspectKind::Square,
            "trine" => AspectKind::Trine,
            "quincunx" | "inconjunct" => AspectKind::Quincunx,
            "opposition" => AspectKind::Opposition,
            _ => return Err(UraniaError::UnknownAspect { id: s.to_string() }),
        };
        Ok(kind)
    }
}

/// One row of the fixed aspect table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    pub angle: f64,
    pub name: &'static str,
    pub is_major: bool,
}

/// Aspect table, ascending by angle; indexed by `AspectKind as usize`.
pub const ASPECT_TABLE: [AspectDefinition; 7] = [
    AspectDefinition {
        kind: AspectKind::Conjunction,
        angle: 0.0,
        name: "conjunction",
        is_major: true,
    },
    AspectDefinition {
        kind: AspectKind::Semisextile,
        angle: 30.0,
        name: "semisextile",
        is_major: false,
    },
    AspectDefinition {
        kind: AspectKind::Sextile,
        angle: 60.0,
        name: "sextile",
        is_major: true,
    },
    AspectDefinition {
        kind: AspectKind::Square,
        angle: 90.0,
        name: "square",
        is_major: true,
    },
    AspectDefinition {
        kind: AspectKind::Trine,
        angle: 120.0,
        name: "trine",
        is_major: true,
    },
    AspectDefinition {
        kind: AspectKind::Quincunx,
        angle: 150.0,
        name: "quincunx",
        is_major: false,
    },
    AspectDefinition {
        kind: AspectKind::Opposition,
        angle: 180.0,
        name: "opposition",
        is_major: true,
    },
];

/// An aspect found between two bodies in one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AspectInstance {
    pub body_a: Body,
    pub body_b: Body,
    pub definition: AspectDefinition,
    /// Deviation from the exact angle in degrees.
    pub orb: f64,
    /// `None` when neither body is moving.
    pub applying: Option<bool>,
    /// Within 0.1 degrees of exact.
    pub is_exact: bool,
    /// Whether either body is retrograde.
    pub involves_retrograde: bool,
}

impl AspectInstance {
    pub fn kind(&self) -> AspectKind {
        self.definition.kind
    }

    pub fn involves(&self, body: Body) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// The other end of the aspect, if `body` is one of its ends.
    pub fn other(&self, body: Body) -> Option<Body> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// How to choose between several aspects that all fall within orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Tightest orb wins.
    #[default]
    Closest,
    /// First table entry within orb wins.
    TableOrder,
}

/// Orb budget for aspect matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    pub default_orb: f64,
    /// Per-aspect orbs, overriding `default_orb`.
    pub aspect_orbs: HashMap<AspectKind, f64>,
    /// Per-body orbs. When either body of a pair has one, the larger of the
    /// pair's entries replaces the aspect orb.
    pub body_orbs: HashMap<Body, f64>,
    pub include_minor: bool,
    pub tie_break: TieBreak,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            default_orb: 8.0,
            aspect_orbs: HashMap::new(),
            body_orbs: HashMap::new(),
            include_minor: true,
            tie_break: TieBreak::Closest,
        }
    }
}

impl OrbConfig {
    /// Same orb for every aspect and body.
    pub fn uniform(orb: f64) -> Self {
        Self {
            default_orb: orb,
            ..Self::default()
        }
    }

    /// Orb allowed for `kind` between `a` and `b`.
    pub fn orb_for(&self, kind: AspectKind, a: Body, b: Body) -> f64 {
        let body_orb = match (self.body_orbs.get(&a), self.body_orbs.get(&b)) {
            (Some(x), Some(y)) => Some(x.max(*y)),
            (Some(x), None) | (None, Some(x)) => Some(*x),
            (None, None) => None,
        };
        body_orb
            .or_else(|| self.aspect_orbs.get(&kind).copied())
            .unwrap_or(self.default_orb)
    }

    /// Table rows this configuration considers.
    pub fn active_definitions(&self) -> impl Iterator<Item = &'static AspectDefinition> + '_ {
        ASPECT_TABLE
            .iter()
            .filter(move |def| def.is_major || self.include_minor)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        let orbs = std::iter::once(&self.default_orb)
            .chain(self.aspect_orbs.values())
            .chain(self.body_orbs.values());
        for orb in orbs {
            if !orb.is_finite() || *orb < 0.0 {
                return Err(UraniaError::invalid_config(format!(
                    "orbs must be finite and non-negative, got {orb}"
                )));
            }
        }
        Ok(())
    }
}
