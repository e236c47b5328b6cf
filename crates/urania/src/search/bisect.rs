//! Exact-instant root finder.
//!
//! Pure bisection on f(t) = signed_delta(lon(t), target). Bisection rather
//! than Newton iteration because speeds near a station are tiny or change
//! sign, which makes derivative steps unreliable.

use crate::angles::{is_genuine_crossing, signed_delta};
use crate::bodies::Body;
use crate::ephemeris::{EphemerisProvider, Position};
use crate::error::{Result, UraniaError};
use crate::search::types::ExactHit;
use crate::time::{validate_window, SECONDS_PER_DAY};
use serde::{Deserialize, Serialize};

/// Convergence settings for bisection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectionConfig {
    /// Stop as soon as |f(t)| falls below this many degrees.
    pub angle_epsilon_deg: f64,
    /// Stop once the bracket is narrower than this many days.
    pub time_precision_days: f64,
    /// Upper bound on halvings; the best bracket so far is returned when hit.
    pub max_iterations: u32,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            angle_epsilon_deg: 1e-4,
            time_precision_days: 1.0 / SECONDS_PER_DAY,
            max_iterations: 64,
        }
    }
}

impl BisectionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.angle_epsilon_deg.is_finite() || self.angle_epsilon_deg <= 0.0 {
            return Err(UraniaError::invalid_config("angle_epsilon_deg must be positive"));
        }
        if !self.time_precision_days.is_finite() || self.time_precision_days <= 0.0 {
            return Err(UraniaError::invalid_config("time_precision_days must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(UraniaError::invalid_config("max_iterations must be > 0"));
        }
        Ok(())
    }
}

/// Signed distance still to travel to `target` at `jd`.
pub(crate) fn crossing_error<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    target: f64,
    jd: f64,
) -> Result<(f64, Position)> {
    let position = provider.position(body, jd)?;
    Ok((signed_delta(position.longitude, target), position))
}

fn hit(jd: f64, error: f64, position: Position, target: f64) -> ExactHit {
    ExactHit {
        jd,
        orb: error.abs(),
        position,
        target_longitude: crate::angles::normalize(target),
    }
}

/// Bisect an explicit bracket `[low_jd, high_jd]` for the instant `body`
/// reaches `target` degrees.
///
/// Returns `Ok(None)` when f does not change sign across the bracket.
/// Provider failures propagate immediately: one bad sample invalidates
/// the halving step.
pub fn bisect_crossing<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    target: f64,
    low_jd: f64,
    high_jd: f64,
    config: &BisectionConfig,
) -> Result<Option<ExactHit>> {
    config.validate()?;
    validate_window(low_jd, high_jd)?;
    if !target.is_finite() {
        return Err(UraniaError::invalid_input("target longitude must be finite"));
    }

    let (mut low, mut high) = (low_jd, high_jd);
    let (mut f_low, pos_low) = crossing_error(provider, body, target, low)?;
    if f_low.abs() < config.angle_epsilon_deg {
        return Ok(Some(hit(low, f_low, pos_low, target)));
    }
    let (f_high, pos_high) = crossing_error(provider, body, target, high)?;
    if f_high.abs() < config.angle_epsilon_deg {
        return Ok(Some(hit(high, f_high, pos_high, target)));
    }

    if !is_genuine_crossing(f_low, f_high) {
        log::debug!(
            "No crossing of {:.4} by {} in [{:.5}, {:.5}] (f = {:.4} .. {:.4})",
            target,
            body,
            low,
            high,
            f_low,
            f_high
        );
        return Ok(None);
    }

    for iteration in 0..config.max_iterations {
        let mid = 0.5 * (low + high);
        let (f_mid, pos_mid) = crossing_error(provider, body, target, mid)?;
        if f_mid.abs() < config.angle_epsilon_deg {
            log::debug!("{} reached {:.4} after {} halvings", body, target, iteration + 1);
            return Ok(Some(hit(mid, f_mid, pos_mid, target)));
        }

        // For forward motion f > 0 means the target is still ahead and the
        // crossing lies in the later half. Comparing against f(low) keeps the
        // same rule valid for a retrograde crossing.
        if f_mid.signum() == f_low.signum() {
            low = mid;
            f_low = f_mid;
        } else {
            high = mid;
        }

        if high - low < config.time_precision_days {
            break;
        }
    }

    // Best effort: the narrowest bracket reached, even if the iteration
    // budget ran out first.
    let mid = 0.5 * (low + high);
    let (f_mid, pos_mid) = crossing_error(provider, body, target, mid)?;
    Ok(Some(hit(mid, f_mid, pos_mid, target)))
}

/// Find the crossing of `target` within `window_days` either side of an
/// approximate instant.
pub fn find_exact_crossing<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    target: f64,
    approx_jd: f64,
    window_days: f64,
    config: &BisectionConfig,
) -> Result<Option<ExactHit>> {
    if !window_days.is_finite() || window_days <= 0.0 {
        return Err(UraniaError::invalid_input("search window must be positive"));
    }
    bisect_crossing(
        provider,
        body,
        target,
        approx_jd - window_days,
        approx_jd + window_days,
        config,
    )
}
