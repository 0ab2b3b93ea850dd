use super::*;

#[test]
fn endpoints_are_exact_for_every_curve() {
    for ease in Easing::ALL {
        assert_eq!(ease.apply(0.0), 0.0, "{ease:?}");
        assert_eq!(ease.apply(1.0), 1.0, "{ease:?}");
        assert_eq!(ease.perform(-3.5, 12.25, 0.0), -3.5, "{ease:?}");
        assert_eq!(ease.perform(-3.5, 12.25, 1.0), 12.25, "{ease:?}");
    }
}

#[test]
fn progress_outside_unit_range_is_clamped() {
    for ease in Easing::ALL {
        assert_eq!(ease.perform(2.0, 4.0, -1.0), 2.0);
        assert_eq!(ease.perform(2.0, 4.0, 7.0), 4.0);
        assert_eq!(ease.apply(f64::NAN), 0.0);
    }
}

#[test]
fn monotonic_curves_spot_check() {
    let overshooting = [
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::InOutElastic,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];
    for ease in Easing::ALL {
        if overshooting.contains(&ease) {
            continue;
        }
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b && b < c, "{ease:?}");
    }
}

#[test]
fn back_and_elastic_overshoot() {
    assert!(Easing::InBack.apply(0.2) < 0.0);
    assert!(Easing::OutBack.apply(0.8) > 1.0);
    let peak = (1..100)
        .map(|i| Easing::OutElastic.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn linear_and_quad_midpoints() {
    assert_eq!(Easing::Linear.perform(0.0, 500.0, 0.5), 250.0);
    assert!((Easing::InQuad.apply(0.5) - 0.25).abs() < 1e-12);
    assert!((Easing::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((Easing::OutBounce.apply(0.5) - 0.765625).abs() < 1e-9);
}

#[test]
fn names_round_trip_through_from_str_and_serde() {
    for ease in Easing::ALL {
        assert_eq!(ease.name().parse::<Easing>().unwrap(), ease);
        let json = serde_json::to_string(&ease).unwrap();
        assert_eq!(json, format!("\"{}\"", ease.name()));
    }
    assert!("wobbly".parse::<Easing>().is_err());
}
