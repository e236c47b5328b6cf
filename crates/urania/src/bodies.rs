//! Chart bodies and their fixed properties.

use crate::error::UraniaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bodies the engine can position and relate.
///
/// Ordering follows the conventional chart listing and is what every
/// enumeration in the crate iterates by, so results never depend on the
/// iteration order of a caller's map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
    SouthNode,
}

impl Body {
    pub const ALL: [Body; 13] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
        Body::NorthNode,
        Body::SouthNode,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::Chiron => "chiron",
            Body::NorthNode => "north_node",
            Body::SouthNode => "south_node",
        }
    }

    /// Display name used in pattern descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::Chiron => "Chiron",
            Body::NorthNode => "North Node",
            Body::SouthNode => "South Node",
        }
    }

    /// Swiss Ephemeris planet code. The south node has none; it is derived
    /// from the true north node.
    pub fn swiss_code(self) -> Option<i32> {
        match self {
            Body::Sun => Some(0),
            Body::Moon => Some(1),
            Body::Mercury => Some(2),
            Body::Venus => Some(3),
            Body::Mars => Some(4),
            Body::Jupiter => Some(5),
            Body::Saturn => Some(6),
            Body::Uranus => Some(7),
            Body::Neptune => Some(8),
            Body::Pluto => Some(9),
            Body::Chiron => Some(15),
            Body::NorthNode => Some(11),
            Body::SouthNode => None,
        }
    }

    /// Bodies whose daily motion is large enough to need a half-day
    /// transit scan step.
    pub fn is_fast_moving(self) -> bool {
        matches!(
            self,
            Body::Sun | Body::Moon | Body::Mercury | Body::Venus | Body::Mars
        )
    }

    /// The body that always sits exactly opposite this one, if any.
    pub fn antipode(self) -> Option<Body> {
        match self {
            Body::NorthNode => Some(Body::SouthNode),
            Body::SouthNode => Some(Body::NorthNode),
            _ => None,
        }
    }

    /// Pairs whose separation is fixed by construction and therefore never
    /// a discovered aspect.
    pub fn is_fixed_pair(a: Body, b: Body) -> bool {
        a.antipode() == Some(b)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Body {
    type Err = UraniaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Body::ALL
            .iter()
            .copied()
            .find(|body| body.id() == lower)
            .or(match lower.as_str() {
                "true_node" | "rahu" => Some(Body::NorthNode),
                "ketu" => Some(Body::SouthNode),
                _ => None,
            })
            .ok_or_else(|| UraniaError::UnknownBody { id: s.to_string() })
    }
}
