mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{positions, FailingDays, LinearEphemeris, OscillatingEphemeris};
use std::collections::HashSet;
use urania::scan::{sample_series, scan_range, EclipseEvent, EclipseKind};
use urania::search::CancelToken;
use urania::time::julian_day_to_datetime;
use urania::{AspectKind, Body, ChartSample, Criterion, ScanCriteria, UraniaError, ZodiacSign};

/// 2460000.0 is a whole multiple of the oscillation period, so the series
/// starts at phase zero.
const PHASE_ZERO_JD: f64 = 2_460_000.0;

fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
}

fn sun_at(hours: i64, longitude: f64) -> ChartSample {
    ChartSample::new(at(hours), positions(&[(Body::Sun, longitude, 1.0)]))
}

fn mars_series() -> Vec<ChartSample> {
    let mars = OscillatingEphemeris {
        body: Body::Mars,
        center: 100.0,
        amplitude: 5.0,
        period: 40.0,
    };
    let start = julian_day_to_datetime(PHASE_ZERO_JD).unwrap();
    sample_series(
        &mars,
        &[Body::Mars],
        start,
        start + Duration::days(100),
        Duration::hours(6),
        None,
    )
    .unwrap()
}

#[test]
fn test_retrograde_ranges() {
    let samples = mars_series();
    assert_eq!(samples.len(), 401);
    let criteria = ScanCriteria::new(vec![Criterion::Retrograde { body: Body::Mars }]);

    let result = scan_range(&samples, &criteria);

    assert_eq!(result.range_count, 3);
    assert_eq!(result.ranges.len(), 3);
    let start = samples[0].instant;
    let first = &result.ranges[0];
    assert!(first.start >= start + Duration::days(10));
    assert!(first.start <= start + Duration::hours(246));
    assert!(first.end < start + Duration::days(30) + Duration::hours(1));
    assert_eq!(
        result.total_matches,
        result.ranges.iter().map(|r| r.match_count).sum::<usize>()
    );
}

#[test]
fn test_rescan_is_identical() {
    let samples = mars_series();
    let criteria = ScanCriteria::new(vec![Criterion::LongitudeRange {
        body: Body::Mars,
        from: 102.0,
        to: 110.0,
    }]);

    let first = scan_range(&samples, &criteria);
    let second = scan_range(&samples, &criteria);
    assert!(!first.ranges.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_gap_equal_to_threshold_is_contiguous() {
    let samples = vec![sun_at(0, 5.0), sun_at(72, 6.0), sun_at(145, 7.0)];
    let criteria = ScanCriteria::new(vec![Criterion::InSign {
        body: Body::Sun,
        sign: ZodiacSign::Aries,
    }]);

    let result = scan_range(&samples, &criteria);

    assert_eq!(result.range_count, 2);
    assert_eq!(result.ranges[0].start, at(0));
    assert_eq!(result.ranges[0].end, at(72));
    assert_eq!(result.ranges[1].match_count, 1);
}

#[test]
fn test_unordered_samples_refer_to_input_indices() {
    let samples = vec![sun_at(48, 5.0), sun_at(0, 3.0), sun_at(24, 4.0), sun_at(500, 200.0)];
    let criteria = ScanCriteria::new(vec![Criterion::LongitudeRange {
        body: Body::Sun,
        from: 0.0,
        to: 30.0,
    }]);

    let result = scan_range(&samples, &criteria);

    assert_eq!(result.range_count, 1);
    let range = &result.ranges[0];
    assert_eq!((range.start, range.end), (at(0), at(48)));
    assert_eq!((range.start_sample, range.end_sample), (1, 0));
    assert_eq!(range.match_count, 3);
}

#[test]
fn test_eclipse_criteria_use_shorter_gap() {
    let eclipse = |longitude| EclipseEvent {
        kind: EclipseKind::SolarTotal,
        longitude,
    };
    let samples = vec![
        sun_at(0, 10.0).with_eclipse(eclipse(10.0)),
        sun_at(24, 11.0).with_eclipse(eclipse(11.0)),
        sun_at(72, 13.0).with_eclipse(eclipse(13.0)),
        sun_at(96, 190.0).with_eclipse(eclipse(190.0)),
    ];

    let any_solar = ScanCriteria::new(vec![Criterion::Eclipse {
        kind: Some(EclipseKind::SolarTotal),
        sign: None,
    }]);
    assert_eq!(any_solar.max_gap, Duration::hours(24));
    let result = scan_range(&samples, &any_solar);
    assert_eq!(result.range_count, 2);
    assert_eq!(result.ranges[0].match_count, 2);

    // A wider eclipse gap bridges the 48 hour hole
    let wide = ScanCriteria::with_gaps(
        any_solar.criteria.clone(),
        Duration::hours(72),
        Duration::hours(48),
    );
    assert_eq!(wide.max_gap, Duration::hours(48));
    assert_eq!(scan_range(&samples, &wide).range_count, 1);

    let in_aries = ScanCriteria::new(vec![Criterion::Eclipse {
        kind: None,
        sign: Some(ZodiacSign::Aries),
    }]);
    assert_eq!(scan_range(&samples, &in_aries).total_matches, 3);

    assert!(samples.iter().all(|s| s.eclipse.is_some_and(|e| e.kind.is_solar())));
    assert!(!EclipseKind::LunarPenumbral.is_solar());

    let lunar = ScanCriteria::new(vec![Criterion::Eclipse {
        kind: Some(EclipseKind::LunarTotal),
        sign: None,
    }]);
    assert_eq!(scan_range(&samples, &lunar).total_matches, 0);
}

#[test]
fn test_criteria_are_conjunctive() {
    let sample = ChartSample::new(
        at(0),
        positions(&[(Body::Sun, 355.0, 1.0), (Body::Saturn, 85.0, -0.02)]),
    );

    let wrapping = Criterion::LongitudeRange {
        body: Body::Sun,
        from: 350.0,
        to: 10.0,
    };
    let square = Criterion::Aspect {
        a: Body::Sun,
        b: Body::Saturn,
        kind: AspectKind::Square,
        orb: 1.0,
    };
    let saturn_rx = Criterion::Retrograde { body: Body::Saturn };
    let moon_rx = Criterion::Retrograde { body: Body::Moon };

    assert!(ScanCriteria::new(vec![wrapping, square, saturn_rx]).matches(&sample));
    // The Moon is not in the sample at all
    assert!(!ScanCriteria::new(vec![wrapping, moon_rx]).matches(&sample));
    assert!(!ScanCriteria::new(vec![]).matches(&sample));
}

#[test]
fn test_sampler_skips_failed_instants() {
    let provider = FailingDays {
        inner: LinearEphemeris::new().with(Body::Sun, 0.0, 1.0),
        failing: HashSet::from([2_460_002]),
    };
    let start = julian_day_to_datetime(PHASE_ZERO_JD).unwrap();

    let samples = sample_series(
        &provider,
        &[Body::Sun],
        start,
        start + Duration::days(4),
        Duration::days(1),
        None,
    )
    .unwrap();

    assert_eq!(samples.len(), 4);
    assert!(!samples
        .iter()
        .any(|s| s.instant == start + Duration::days(2)));
}

#[test]
fn test_sampler_rejects_bad_arguments_and_cancellation() {
    let provider = LinearEphemeris::new().with(Body::Sun, 0.0, 1.0);
    let start = at(0);

    assert!(matches!(
        sample_series(
            &provider,
            &[Body::Sun],
            start,
            start - Duration::days(1),
            Duration::days(1),
            None
        ),
        Err(UraniaError::InvalidInput { .. })
    ));
    assert!(matches!(
        sample_series(
            &provider,
            &[Body::Sun],
            start,
            start + Duration::days(1),
            Duration::zero(),
            None
        ),
        Err(UraniaError::InvalidInput { .. })
    ));

    let token = CancelToken::new();
    token.cancel();
    assert_eq!(
        sample_series(
            &provider,
            &[Body::Sun],
            start,
            start + Duration::days(1),
            Duration::hours(1),
            Some(&token)
        ),
        Err(UraniaError::Cancelled)
    );
}
