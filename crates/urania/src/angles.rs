//! Angular helpers shared by every search and aspect computation.
//!
//! All longitudes are ecliptic degrees. Functions accept any finite input and
//! reduce it, so callers never pre-normalize.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reduce an angle to `[0, 360)`.
pub fn normalize(angle: f64) -> f64 {
    let reduced = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

/// Symmetric angular distance in `[0, 180]`.
pub fn shortest_arc(a: f64, b: f64) -> f64 {
    let diff = normalize(a - b);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Directional difference from `from` to `to` in `(-180, 180]`.
///
/// Positive means `to` lies ahead of `from` in zodiacal order, so
/// `signed_delta(359.0, 1.0) == 2.0`.
pub fn signed_delta(from: f64, to: f64) -> f64 {
    let diff = normalize(to - from);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Time at which a linearly varying error reaches zero between two samples.
///
/// `(t1, v1)` and `(t2, v2)` should bracket the zero (opposite signs, or one
/// of them zero). When both values are equal the first instant is returned.
pub fn wrap_lerp(t1: f64, t2: f64, v1: f64, v2: f64) -> f64 {
    let denom = v1 - v2;
    if denom == 0.0 {
        return t1;
    }
    t1 + v1 / denom * (t2 - t1)
}

/// Whether a sign change between two signed deltas is a real zero crossing
/// rather than the jump from `+180` to `-180` at the far side of the circle.
pub fn is_genuine_crossing(v1: f64, v2: f64) -> bool {
    v1 * v2 < 0.0 && (v1 - v2).abs() < 270.0
}

/// Whether `longitude` lies in the arc running forward from `from` to `to`.
///
/// Arcs with `from > to` wrap through 0°; `from == to` is the single point.
pub fn in_arc(longitude: f64, from: f64, to: f64) -> bool {
    let span = normalize(to - from);
    normalize(longitude - from) <= span
}

/// The twelve tropical signs, 30° each starting at 0° Aries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    pub fn from_longitude(longitude: f64) -> Self {
        let index = (normalize(longitude) / 30.0).floor() as usize;
        Self::ALL[index.min(11)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Longitude of 0° of this sign.
    pub fn start_longitude(self) -> f64 {
        self.index() as f64 * 30.0
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_negatives_and_overflow() {
        assert!((normalize(-10.0) - 350.0).abs() < 1e-12);
        assert!((normalize(725.0) - 5.0).abs() < 1e-12);
        assert_eq!(normalize(360.0), 0.0);
        assert!(normalize(-1e-15) < 360.0);
    }

    #[test]
    fn shortest_arc_wraps() {
        assert!((shortest_arc(359.0, 1.0) - 2.0).abs() < 1e-12);
        assert!((shortest_arc(1.0, 359.0) - 2.0).abs() < 1e-12);
        assert!((shortest_arc(0.0, 180.0) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn signed_delta_direction() {
        assert!((signed_delta(359.0, 1.0) - 2.0).abs() < 1e-12);
        assert!((signed_delta(1.0, 359.0) + 2.0).abs() < 1e-12);
        assert!((signed_delta(0.0, 180.0) - 180.0).abs() < 1e-12);
        assert!((signed_delta(180.0, 0.0) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn wrap_lerp_finds_zero() {
        let t = wrap_lerp(10.0, 12.0, 3.0, -1.0);
        assert!((t - 11.5).abs() < 1e-12);
        assert_eq!(wrap_lerp(4.0, 5.0, 0.0, 0.0), 4.0);
    }

    #[test]
    fn wraparound_jump_is_not_a_crossing() {
        assert!(is_genuine_crossing(2.0, -1.0));
        assert!(!is_genuine_crossing(179.0, -179.0));
        assert!(!is_genuine_crossing(1.0, 2.0));
    }

    #[test]
    fn arc_membership_wraps_through_zero() {
        assert!(in_arc(355.0, 350.0, 10.0));
        assert!(in_arc(5.0, 350.0, 10.0));
        assert!(!in_arc(20.0, 350.0, 10.0));
        assert!(in_arc(15.0, 10.0, 20.0));
    }

    #[test]
    fn sign_lookup() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(359.99), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(-1.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::Libra.start_longitude(), 180.0);
    }
}
