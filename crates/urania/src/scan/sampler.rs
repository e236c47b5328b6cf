use crate::bodies::Body;
use crate::ephemeris::{snapshot, EphemerisProvider};
use crate::error::{Result, UraniaError};
use crate::scan::types::ChartSample;
use crate::search::CancelToken;
use crate::time::datetime_to_julian_day;
use chrono::{DateTime, Duration, Utc};

/// Fixed-step samples of `bodies` over `[start, end]`.
///
/// A provider failure at one instant is logged and that sample skipped; the
/// scan carries on. Only invalid arguments and cancellation are errors.
pub fn sample_series<P: EphemerisProvider + ?Sized>(
    provider: &P,
    bodies: &[Body],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    cancel: Option<&CancelToken>,
) -> Result<Vec<ChartSample>> {
    if step <= Duration::zero() {
        return Err(UraniaError::invalid_input("sample step must be positive"));
    }
    if end < start {
        return Err(UraniaError::invalid_input(format!(
            "sample range end {end} is before start {start}"
        )));
    }

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    let mut instant = start;

    while instant <= end {
        CancelToken::check(cancel)?;

        match snapshot(provider, bodies, datetime_to_julian_day(instant)) {
            Ok(positions) => samples.push(ChartSample::new(instant, positions)),
            Err(e) => {
                skipped += 1;
                log::warn!("Skipping sample at {}: {}", instant, e);
            }
        }
        instant = instant + step;
    }

    if skipped > 0 {
        log::warn!("{} of {} samples skipped", skipped, samples.len() + skipped);
    }
    Ok(samples)
}
