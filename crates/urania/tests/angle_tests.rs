use proptest::prelude::*;
use urania::angles::{in_arc, normalize, shortest_arc, signed_delta, wrap_lerp};

#[test]
fn test_wraparound_pairs() {
    assert!((shortest_arc(359.0, 1.0) - 2.0).abs() < 1e-12);
    assert!((signed_delta(359.0, 1.0) - 2.0).abs() < 1e-12);
    assert!((signed_delta(1.0, 359.0) + 2.0).abs() < 1e-12);
}

#[test]
fn test_wrap_lerp_midpoint() {
    assert!((wrap_lerp(0.0, 2.0, 1.0, -1.0) - 1.0).abs() < 1e-12);
    // Zero at the first sample
    assert_eq!(wrap_lerp(3.0, 4.0, 0.0, -2.0), 3.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn prop_shortest_arc_symmetric_and_bounded(a in -720.0f64..720.0, b in -720.0f64..720.0) {
        let ab = shortest_arc(a, b);
        let ba = shortest_arc(b, a);
        prop_assert!((ab - ba).abs() < 1e-9, "arc({a},{b})={ab} but arc({b},{a})={ba}");
        prop_assert!((0.0..=180.0).contains(&ab));
    }

    #[test]
    fn prop_normalize_idempotent(x in -1.0e6f64..1.0e6) {
        let once = normalize(x);
        prop_assert!((0.0..360.0).contains(&once));
        prop_assert_eq!(normalize(once), once);
    }

    #[test]
    fn prop_signed_delta_range_and_magnitude(a in 0.0f64..360.0, b in 0.0f64..360.0) {
        let d = signed_delta(a, b);
        prop_assert!(d > -180.0 && d <= 180.0);
        prop_assert!((d.abs() - shortest_arc(a, b)).abs() < 1e-9);
        // Moving `a` by `d` lands on `b`
        prop_assert!(shortest_arc(a + d, b) < 1e-9);
    }

    #[test]
    fn prop_arc_membership_of_endpoints(from in 0.0f64..360.0, span in 0.0f64..359.0) {
        let to = normalize(from + span);
        prop_assert!(in_arc(from, from, to));
        prop_assert!(in_arc(normalize(from + span / 2.0), from, to));
    }
}
