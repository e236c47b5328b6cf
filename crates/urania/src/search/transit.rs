//! Transit exactitude: when a moving body perfects an aspect to a fixed
//! (natal) longitude.
//!
//! The window is walked at a fixed step. A pass-through (aspect distance
//! falling then rising, with the turning sample close to exact) is resolved
//! to one hit by bracketing the sign change of the signed error and
//! interpolating or bisecting inside the bracket.

use crate::angles::{is_genuine_crossing, normalize, shortest_arc, signed_delta, wrap_lerp};
use crate::aspects::AspectKind;
use crate::bodies::Body;
use crate::ephemeris::{EphemerisProvider, Position};
use crate::error::{Result, UraniaError};
use crate::search::bisect::{bisect_crossing, BisectionConfig};
use crate::search::cancel::CancelToken;
use crate::search::types::ExactHit;
use crate::time::validate_window;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COOLDOWN_DAYS: f64 = 30.0;
/// Cooldown ceiling for the Moon: half its sidereal period, so consecutive
/// monthly returns to one target are both kept.
pub const MOON_COOLDOWN_DAYS: f64 = 13.6;
pub const FAST_BODY_STEP_DAYS: f64 = 0.5;
pub const SLOW_BODY_STEP_DAYS: f64 = 1.0;
/// Floor for the automatic pass-through threshold.
const MIN_PASS_THROUGH_DEG: f64 = 1.0;

/// How repeated detections of one physical crossing are suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HitDedup {
    /// Drop any hit within `days` of the previous hit on the same target.
    /// Can merge genuinely separate crossings around a retrograde station.
    /// Capped at [`MOON_COOLDOWN_DAYS`] for the Moon.
    Cooldown { days: f64 },
    /// One hit per sign change of the signed error; no time window.
    PerCrossing,
}

impl Default for HitDedup {
    fn default() -> Self {
        HitDedup::Cooldown {
            days: DEFAULT_COOLDOWN_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitSearchConfig {
    /// Scan step. `None` picks 0.5 day for fast bodies, 1 day otherwise.
    pub step_days: Option<f64>,
    /// How close the turning sample must be to exact. `None` uses the
    /// body's current motion over one step, at least 1 degree.
    pub pass_through_threshold_deg: Option<f64>,
    pub dedup: HitDedup,
    /// Bisect inside the bracket instead of a single linear interpolation.
    pub refine: bool,
    pub bisection: BisectionConfig,
}

impl Default for TransitSearchConfig {
    fn default() -> Self {
        Self {
            step_days: None,
            pass_through_threshold_deg: None,
            dedup: HitDedup::default(),
            refine: true,
            bisection: BisectionConfig::default(),
        }
    }
}

impl TransitSearchConfig {
    pub fn step_for(&self, body: Body) -> f64 {
        self.step_days.unwrap_or(if body.is_fast_moving() {
            FAST_BODY_STEP_DAYS
        } else {
            SLOW_BODY_STEP_DAYS
        })
    }

    /// Effective cooldown for `body`, or `None` in per-crossing mode.
    pub fn cooldown_for(&self, body: Body) -> Option<f64> {
        match self.dedup {
            HitDedup::Cooldown { days } if body == Body::Moon => {
                Some(days.min(MOON_COOLDOWN_DAYS))
            }
            HitDedup::Cooldown { days } => Some(days),
            HitDedup::PerCrossing => None,
        }
    }

    fn threshold_for(&self, speed: f64, step: f64) -> f64 {
        self.pass_through_threshold_deg
            .unwrap_or_else(|| (speed.abs() * step).max(MIN_PASS_THROUGH_DEG))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(step) = self.step_days {
            if !step.is_finite() || step <= 0.0 {
                return Err(UraniaError::invalid_config("step_days must be positive"));
            }
        }
        if let Some(threshold) = self.pass_through_threshold_deg {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(UraniaError::invalid_config(
                    "pass_through_threshold_deg must be non-negative",
                ));
            }
        }
        if let HitDedup::Cooldown { days } = self.dedup {
            if !days.is_finite() || days < 0.0 {
                return Err(UraniaError::invalid_config("cooldown days must be non-negative"));
            }
        }
        self.bisection.validate()
    }
}

/// What to search for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitQuery {
    pub body: Body,
    pub aspect: AspectKind,
    pub natal_longitude: f64,
    pub start_jd: f64,
    pub end_jd: f64,
    pub max_orb: f64,
}

impl TransitQuery {
    pub fn validate(&self) -> Result<()> {
        if !self.natal_longitude.is_finite() {
            return Err(UraniaError::invalid_input("natal longitude must be finite"));
        }
        if !self.max_orb.is_finite() || self.max_orb < 0.0 {
            return Err(UraniaError::invalid_input("max_orb must be non-negative"));
        }
        validate_window(self.start_jd, self.end_jd)
    }

    /// Longitudes at which the aspect is exact: natal ± angle, collapsed to
    /// one point for conjunction and opposition.
    pub fn targets(&self) -> Vec<f64> {
        let angle = self.aspect.angle();
        let ahead = normalize(self.natal_longitude + angle);
        let behind = normalize(self.natal_longitude - angle);
        if shortest_arc(ahead, behind) < 1e-9 {
            vec![ahead]
        } else {
            vec![ahead, behind]
        }
    }

    fn distance(&self, longitude: f64) -> f64 {
        (shortest_arc(longitude, self.natal_longitude) - self.aspect.angle()).abs()
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    jd: f64,
    position: Position,
}

struct TransitSearch<'p, P: ?Sized> {
    provider: &'p P,
    query: &'p TransitQuery,
    config: &'p TransitSearchConfig,
    targets: Vec<f64>,
}

impl<'p, P: EphemerisProvider + ?Sized> TransitSearch<'p, P> {
    fn sample_hit(&self, sample: &Sample, target: f64) -> ExactHit {
        ExactHit {
            jd: sample.jd,
            orb: signed_delta(sample.position.longitude, target).abs(),
            position: sample.position,
            target_longitude: target,
        }
    }

    /// Resolve a sign change of the signed error between two samples.
    fn resolve_bracket(&self, lo: &Sample, hi: &Sample, target: f64) -> Result<ExactHit> {
        if self.config.refine {
            if let Some(hit) = bisect_crossing(
                self.provider,
                self.query.body,
                target,
                lo.jd,
                hi.jd,
                &self.config.bisection,
            )? {
                return Ok(hit);
            }
        }

        let e_lo = signed_delta(lo.position.longitude, target);
        let e_hi = signed_delta(hi.position.longitude, target);
        let jd = wrap_lerp(lo.jd, hi.jd, e_lo, e_hi);
        let position = self.provider.position(self.query.body, jd)?;
        Ok(ExactHit {
            jd,
            orb: signed_delta(position.longitude, target).abs(),
            position,
            target_longitude: target,
        })
    }

    /// Turn a pass-through centred on `b` into a hit, if the error actually
    /// changes sign next to it. A station that turns back short of exact
    /// yields nothing. The hit comes back with the index of its target.
    fn resolve_pass(
        &self,
        a: &Sample,
        b: &Sample,
        c: &Sample,
    ) -> Result<Option<(usize, ExactHit)>> {
        let Some((index, target)) = self
            .targets
            .iter()
            .copied()
            .enumerate()
            .min_by(|(_, x), (_, y)| {
                shortest_arc(b.position.longitude, *x)
                    .total_cmp(&shortest_arc(b.position.longitude, *y))
            })
        else {
            return Ok(None);
        };

        let e_a = signed_delta(a.position.longitude, target);
        let e_b = signed_delta(b.position.longitude, target);
        let e_c = signed_delta(c.position.longitude, target);

        if e_b == 0.0 {
            return Ok(Some((index, self.sample_hit(b, target))));
        }
        if is_genuine_crossing(e_a, e_b) {
            return Ok(Some((index, self.resolve_bracket(a, b, target)?)));
        }
        if is_genuine_crossing(e_b, e_c) {
            return Ok(Some((index, self.resolve_bracket(b, c, target)?)));
        }

        log::debug!(
            "{} turned {:.4} short of {:.4} near JD {:.3}; no exact hit",
            self.query.body,
            e_b.abs(),
            target,
            b.jd
        );
        Ok(None)
    }
}

/// Every instant in the query window at which `query.body` perfects the
/// aspect to the natal longitude.
///
/// Provider failures abort the search. Crossings whose turning sample falls
/// on the first or last step are not seen in cooldown mode.
pub fn find_transit_hits<P: EphemerisProvider + ?Sized>(
    provider: &P,
    query: &TransitQuery,
    config: &TransitSearchConfig,
    cancel: Option<&CancelToken>,
) -> Result<Vec<ExactHit>> {
    query.validate()?;
    config.validate()?;

    let search = TransitSearch {
        provider,
        query,
        config,
        targets: query.targets(),
    };
    let step = config.step_for(query.body);
    let steps = ((query.end_jd - query.start_jd) / step).ceil() as usize;
    let cooldown = config.cooldown_for(query.body);

    let mut hits: Vec<ExactHit> = Vec::new();
    let mut last_hit_jd: Vec<Option<f64>> = vec![None; search.targets.len()];
    let mut prev2: Option<Sample> = None;
    let mut prev: Option<Sample> = None;

    for k in 0..=steps {
        CancelToken::check(cancel)?;

        let jd = (query.start_jd + k as f64 * step).min(query.end_jd);
        let curr = Sample {
            jd,
            position: provider.position(query.body, jd)?,
        };

        match cooldown {
            Some(days) => {
                if let (Some(a), Some(b)) = (prev2, prev) {
                    let (d_a, d_b, d_c) = (
                        query.distance(a.position.longitude),
                        query.distance(b.position.longitude),
                        query.distance(curr.position.longitude),
                    );
                    // A crossing midway between samples leaves d_b == d_c
                    let passed_through = d_b < d_a && d_c >= d_b;
                    if passed_through
                        && d_b <= query.max_orb
                        && d_b <= config.threshold_for(b.position.speed, step)
                    {
                        if let Some((index, hit)) = search.resolve_pass(&a, &b, &curr)? {
                            match last_hit_jd[index] {
                                Some(last) if hit.jd - last < days => {
                                    log::debug!(
                                        "Suppressing hit at JD {:.4}: within {} days of JD {:.4}",
                                        hit.jd,
                                        days,
                                        last
                                    );
                                }
                                _ => {
                                    last_hit_jd[index] = Some(hit.jd);
                                    hits.push(hit);
                                }
                            }
                        }
                    }
                }
            }
            None => {
                for &target in &search.targets {
                    let e_curr = signed_delta(curr.position.longitude, target);
                    if e_curr == 0.0 {
                        hits.push(search.sample_hit(&curr, target));
                        continue;
                    }
                    if let Some(p) = prev {
                        let e_prev = signed_delta(p.position.longitude, target);
                        if is_genuine_crossing(e_prev, e_curr) {
                            hits.push(search.resolve_bracket(&p, &curr, target)?);
                        }
                    }
                }
            }
        }

        prev2 = prev;
        prev = Some(curr);
        if jd >= query.end_jd {
            break;
        }
    }

    hits.sort_by(|a, b| a.jd.total_cmp(&b.jd));
    log::debug!(
        "{} {} natal {:.4}: {} hits",
        query.body,
        query.aspect,
        query.natal_longitude,
        hits.len()
    );
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(aspect: AspectKind, natal: f64) -> TransitQuery {
        TransitQuery {
            body: Body::Saturn,
            aspect,
            natal_longitude: natal,
            start_jd: 0.0,
            end_jd: 10.0,
            max_orb: 2.0,
        }
    }

    #[test]
    fn conjunction_and_opposition_have_one_target() {
        assert_eq!(query(AspectKind::Conjunction, 345.0).targets(), vec![345.0]);
        assert_eq!(query(AspectKind::Opposition, 10.0).targets(), vec![190.0]);
    }

    #[test]
    fn square_has_two_targets() {
        let targets = query(AspectKind::Square, 345.0).targets();
        assert_eq!(targets.len(), 2);
        assert!((targets[0] - 75.0).abs() < 1e-9);
        assert!((targets[1] - 255.0).abs() < 1e-9);
    }

    #[test]
    fn step_follows_body_speed_class() {
        let config = TransitSearchConfig::default();
        assert_eq!(config.step_for(Body::Moon), FAST_BODY_STEP_DAYS);
        assert_eq!(config.step_for(Body::Saturn), SLOW_BODY_STEP_DAYS);
    }

    #[test]
    fn cooldown_is_capped_for_the_moon() {
        let config = TransitSearchConfig::default();
        assert_eq!(config.cooldown_for(Body::Moon), Some(MOON_COOLDOWN_DAYS));
        assert_eq!(config.cooldown_for(Body::Mars), Some(DEFAULT_COOLDOWN_DAYS));

        let short = TransitSearchConfig {
            dedup: HitDedup::Cooldown { days: 5.0 },
            ..TransitSearchConfig::default()
        };
        assert_eq!(short.cooldown_for(Body::Moon), Some(5.0));

        let per_crossing = TransitSearchConfig {
            dedup: HitDedup::PerCrossing,
            ..TransitSearchConfig::default()
        };
        assert_eq!(per_crossing.cooldown_for(Body::Moon), None);
    }

    #[test]
    fn rejects_negative_orb() {
        let mut q = query(AspectKind::Trine, 10.0);
        q.max_orb = -1.0;
        assert!(q.validate().is_err());
    }
}
