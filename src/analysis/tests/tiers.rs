use crate::analysis::tests::utils::airport_year;
use crate::analysis::tiers::{
    FLOOR_TIER, TierDefinition, UNDEFINED_TIER, classify_all, compare_tiers, suggested_thresholds,
};
use crate::error::FaixaError;

#[test]
fn test_default_tiers_shape() {
    let tiers = TierDefinition::default_tiers();

    assert_eq!(12, tiers.bins().len());
    assert_eq!(11, tiers.labels().len());
    assert_eq!(0.0, tiers.bins()[0]);
    assert_eq!(f64::INFINITY, *tiers.bins().last().unwrap());
    assert_eq!(FLOOR_TIER, &*tiers.labels()[0]);
    assert_eq!("Faixa_10", &*tiers.labels()[10]);
}

#[test]
fn test_build_custom_tiers() {
    let tiers = TierDefinition::build(3, &[100.0, 1_000.0, 10_000.0]).unwrap();

    assert_eq!(
        vec![0.0, 100.0, 1_000.0, 10_000.0, f64::INFINITY],
        tiers.bins().to_vec()
    );
    let labels = tiers.labels().iter().map(|l| l.to_string()).collect::<Vec<_>>();
    assert_eq!(vec!["Faixa_AvG", "Faixa_1", "Faixa_2", "Faixa_3"], labels);
    assert_eq!(3, tiers.count());
}

#[test]
fn test_build_rejects_bad_configuration() {
    assert!(matches!(
        TierDefinition::build(2, &[1.0, 2.0]),
        Err(FaixaError::TierCount { count: 2 })
    ));
    assert!(matches!(
        TierDefinition::build(12, &suggested_thresholds(11)),
        Err(FaixaError::TierCount { count: 12 })
    ));
    assert!(matches!(
        TierDefinition::build(3, &[1.0, 2.0]),
        Err(FaixaError::ThresholdCount {
            expected: 3,
            actual: 2
        })
    ));
    assert!(matches!(
        TierDefinition::build(3, &[10.0, 10.0, 20.0]),
        Err(FaixaError::NonMonotonicThresholds { index: 1, .. })
    ));
    assert!(matches!(
        TierDefinition::build(3, &[0.0, 10.0, 20.0]),
        Err(FaixaError::InvalidThreshold { index: 0, .. })
    ));
    assert!(matches!(
        TierDefinition::build(3, &[1.0, 10.0, f64::NAN]),
        Err(FaixaError::InvalidThreshold { index: 2, .. })
    ));
}

#[test]
fn test_suggested_thresholds_build() {
    for count in 3..=11 {
        let thresholds = suggested_thresholds(count);
        assert_eq!(count, thresholds.len());
        assert!(TierDefinition::build(count, &thresholds).is_ok());
    }
}

#[test]
fn test_boundary_value_falls_in_upper_tier() {
    let tiers = TierDefinition::build(3, &[100.0, 1_000.0, 10_000.0]).unwrap();

    assert_eq!("Faixa_AvG", &*tiers.classify(0.0));
    assert_eq!("Faixa_AvG", &*tiers.classify(99.999));
    assert_eq!("Faixa_1", &*tiers.classify(100.0));
    assert_eq!("Faixa_2", &*tiers.classify(1_000.0));
    assert_eq!("Faixa_3", &*tiers.classify(10_000.0));
    assert_eq!("Faixa_3", &*tiers.classify(1e12));
}

#[test]
fn test_last_tier_lower_bound_is_inclusive() {
    let tiers = TierDefinition::build(3, &[10.0, 50.0, 100.0]).unwrap();
    let classified = classify_all(&[airport_year("X", 2021, 100.0)], &tiers);
    assert_eq!("Faixa_3", &*classified[0].tier);
}

#[test]
fn test_values_outside_every_tier_are_undefined() {
    let tiers = TierDefinition::default_tiers();

    let classified = classify_all(
        &[
            airport_year("NEG", 2021, -1.0),
            airport_year("NAN", 2021, f64::NAN),
            airport_year("OK", 2021, 2_000.0),
        ],
        &tiers,
    );

    assert_eq!(3, classified.len());
    assert_eq!(UNDEFINED_TIER, &*classified[0].tier);
    assert_eq!(UNDEFINED_TIER, &*classified[1].tier);
    assert_eq!("Faixa_1", &*classified[2].tier);
}

#[test]
fn test_range_and_resolve_label() {
    let tiers = TierDefinition::default_tiers();

    assert_eq!(Some((0.0, 2_000.0)), tiers.range_of("Faixa_AvG"));
    assert_eq!(Some((15_000_000.0, f64::INFINITY)), tiers.range_of("Faixa_10"));
    assert_eq!(None, tiers.range_of("Faixa_11"));

    assert_eq!("Faixa_3", &*tiers.resolve_label("3").unwrap());
    assert_eq!("Faixa_AvG", &*tiers.resolve_label("AvG").unwrap());
    assert_eq!("Faixa_7", &*tiers.resolve_label("Faixa_7").unwrap());
    assert!(matches!(
        tiers.resolve_label("11"),
        Err(FaixaError::UnknownTier { .. })
    ));
}

#[test]
fn test_tier_ordering() {
    let mut labels = vec!["Faixa_10", UNDEFINED_TIER, "Faixa_2", FLOOR_TIER, "Faixa_1"];
    labels.sort_by(|a, b| compare_tiers(a, b));
    assert_eq!(
        vec![FLOOR_TIER, "Faixa_1", "Faixa_2", "Faixa_10", UNDEFINED_TIER],
        labels
    );
}
