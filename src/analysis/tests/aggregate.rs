use crate::analysis::aggregate::{
    AircraftDetail, PeriodAircraftSummary, aggregate_by_period_aircraft,
    aggregate_by_threshold_bucket, aircraft_detail, distribution, explore, percentage,
    top_utilization, utilization_by_period,
};
use crate::analysis::tests::utils::{airport_year, classified, flight, id, with_category};
use crate::error::FaixaError;
use crate::period::Period;
use std::collections::BTreeSet;

#[test]
fn test_percentage_of_zero_is_zero() {
    assert_eq!(0.0, percentage(5.0, 0.0));
    assert_eq!(50.0, percentage(1.0, 2.0));
}

#[test]
fn test_distribution_in_tier_order() {
    let rows = distribution(&[
        classified("SBAA", 2022, 40_000.0, "Faixa_2"),
        classified("SBBB", 2022, 20_000.0, "Faixa_10"),
        classified("SBCC", 2022, 100.0, "Faixa_AvG"),
        classified("SBDD", 2022, 300.0, "Faixa_AvG"),
        classified("SBCC", 2021, 500.0, "Faixa_AvG"),
    ]);

    let keys = rows
        .iter()
        .map(|r| (r.tier.to_string(), r.year))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            ("Faixa_AvG".to_string(), 2021),
            ("Faixa_AvG".to_string(), 2022),
            ("Faixa_2".to_string(), 2022),
            ("Faixa_10".to_string(), 2022),
        ],
        keys
    );
    assert_eq!(2, rows[1].airports);
    assert_eq!(200.0, rows[1].mean);
    assert_eq!(400.0, rows[1].total);
    assert_eq!(100.0, rows[1].min);
    assert_eq!(300.0, rows[1].max);
}

#[test]
fn test_explore_ranks_with_code_tie_break() {
    let records = vec![
        classified("SBZZ", 2022, 500.0, "Faixa_AvG"),
        classified("SBAA", 2022, 500.0, "Faixa_AvG"),
        classified("SBMM", 2022, 900.0, "Faixa_AvG"),
        classified("SBXX", 2022, 8_000.0, "Faixa_1"),
        classified("SBAA", 2021, 1.0, "Faixa_AvG"),
    ];

    let result = explore(&records, "Faixa_AvG", 2022);

    let ranking = result
        .airports
        .iter()
        .map(|r| (r.rank, r.airport.to_string()))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            (1, "SBMM".to_string()),
            (2, "SBAA".to_string()),
            (3, "SBZZ".to_string())
        ],
        ranking
    );
    assert_eq!(1_900.0, result.total);
    assert_eq!(500.0, result.min);
    assert_eq!(900.0, result.max);
    assert_eq!(1_900.0 / 9_900.0 * 100.0, result.share);

    assert!(explore(&records, "Faixa_5", 2022).airports.is_empty());
}

#[test]
fn test_period_aircraft_sums_and_order() {
    let records = vec![
        flight("SBAA", 2022, 10, "A320", 5, 500.0),
        flight("SBBB", 2022, 10, "A320", 5, 600.0),
        flight("SBAA", 2022, 2, "A320", 1, 100.0),
        flight("SBAA", 2022, 2, "ATR", 3, 90.0),
    ];

    let summary = aggregate_by_period_aircraft(&records, None);

    let rows = summary
        .rows
        .iter()
        .map(|r| (r.period, r.aircraft.to_string(), r.flights, r.passengers))
        .collect::<Vec<_>>();
    assert_eq!(
        vec![
            (Period::new(2022, 2), "A320".to_string(), 1, 100.0),
            (Period::new(2022, 2), "ATR".to_string(), 3, 90.0),
            (Period::new(2022, 10), "A320".to_string(), 10, 1_100.0),
        ],
        rows
    );
    assert_eq!("A320", &*summary.top[0].aircraft);
    assert_eq!(11, summary.top[0].flights);
}

#[test]
fn test_top_n_tie_break() {
    let records = vec![
        flight("SBAA", 2022, 1, "B738", 10, 100.0),
        flight("SBAA", 2022, 1, "A320", 10, 100.0),
        flight("SBAA", 2022, 1, "E195", 10, 200.0),
        flight("SBAA", 2022, 1, "ATR", 2, 20.0),
    ];

    let summary = aggregate_by_period_aircraft(&records, Some(2));

    let top = summary
        .top
        .iter()
        .map(|t| (t.rank, t.aircraft.to_string()))
        .collect::<Vec<_>>();
    assert_eq!(vec![(1, "E195".to_string()), (2, "A320".to_string())], top);
    assert_eq!(2, summary.rows.len());
    assert!(summary.rows.iter().all(|r| *r.aircraft != *"B738" && *r.aircraft != *"ATR"));
}

#[test]
fn test_empty_inputs_give_empty_summaries() {
    assert_eq!(PeriodAircraftSummary::default(), aggregate_by_period_aircraft(&[], Some(5)));
    assert!(utilization_by_period(&[]).is_empty());
    assert!(top_utilization(&[], None).is_empty());
    assert!(distribution(&[]).is_empty());
    assert_eq!(
        AircraftDetail::default(),
        aircraft_detail(&[], "A320", Period::new(2022, 1))
    );
}

#[test]
fn test_aircraft_detail() {
    let records = vec![
        flight("SBBB", 2022, 3, "A320", 4, 400.0),
        flight("SBAA", 2022, 3, "A320", 4, 300.0),
        flight("SBCC", 2022, 3, "A320", 8, 900.0),
        flight("SBCC", 2022, 4, "A320", 8, 900.0),
        flight("SBCC", 2022, 3, "ATR", 8, 900.0),
    ];

    let detail = aircraft_detail(&records, "A320", Period::new(2022, 3));

    let airports = detail
        .airports
        .iter()
        .map(|a| a.airport.to_string())
        .collect::<Vec<_>>();
    assert_eq!(vec!["SBCC", "SBAA", "SBBB"], airports);
    assert_eq!(16, detail.flights);
    assert_eq!(1_600.0, detail.passengers);
    assert_eq!(16.0 / 3.0, detail.mean_flights);
}

#[test]
fn test_utilization_percentage() {
    let records = vec![
        flight("SBAA", 2022, 1, "A320", 3, 1.0),
        flight("SBBB", 2022, 1, "A320", 1, 1.0),
        flight("SBCC", 2022, 1, "ATR", 2, 1.0),
        flight("SBDD", 2022, 1, "ATR", 0, 0.0),
        flight("SBAA", 2022, 2, "A320", 3, 1.0),
    ];

    let rows = utilization_by_period(&records);

    assert_eq!(3, rows.len());
    assert_eq!(Period::new(2022, 1), rows[0].period);
    assert_eq!("A320", &*rows[0].aircraft);
    assert_eq!(2, rows[0].airports_using);
    assert_eq!(4, rows[0].airports_active);
    assert_eq!(50.0, rows[0].percentage);
    assert_eq!(25.0, rows[1].percentage);
    assert_eq!(100.0, rows[2].percentage);

    let top = top_utilization(&rows, Some(1));
    assert_eq!(1, top.len());
    assert_eq!("A320", &*top[0].aircraft);
    assert_eq!(75.0, top[0].mean_percentage);
}

#[test]
fn test_bucket_zero_fills_categories() {
    let airport_years = vec![airport_year("SBAA", 2022, 500.0)];
    let flights = vec![
        with_category(flight("SBAA", 2022, 1, "X1", 6, 60.0), "A"),
        with_category(flight("SBAA", 2022, 2, "X2", 4, 40.0), "A"),
    ];

    let buckets = aggregate_by_threshold_bucket(
        &flights,
        &airport_years,
        &BTreeSet::from([2022]),
        &[1_000.0, 5_000.0],
    )
    .unwrap();

    assert_eq!(1, buckets.len());
    let bucket = &buckets[0];
    assert_eq!((0.0, 1_000.0), (bucket.lower, bucket.upper));
    assert_eq!(10, bucket.flights);
    // canonical categories are all present, zero-filled, before the extra one
    assert_eq!(11, bucket.shares.len());
    assert_eq!("1B", &*bucket.shares[0].category);
    let a = bucket.shares.iter().find(|s| *s.category == *"A").unwrap();
    assert_eq!(100.0, a.flight_share);
    assert_eq!(100.0, a.passenger_share);
    assert!(
        bucket
            .shares
            .iter()
            .filter(|s| *s.category != *"A")
            .all(|s| s.flights == 0 && s.flight_share == 0.0 && s.passenger_share == 0.0)
    );
}

#[test]
fn test_bucket_bounds_and_shares() {
    let airport_years = vec![
        airport_year("SBAA", 2022, 1_000.0),
        airport_year("SBBB", 2022, 1_000.5),
        airport_year("SBBB", 2021, 10.0),
    ];
    let flights = vec![
        flight("SBAA", 2022, 1, "C208", 3, 0.0),
        flight("SBAA", 2022, 1, "A320", 1, 0.0),
        flight("SBBB", 2022, 1, "A320", 2, 200.0),
        flight("SBBB", 2021, 1, "A320", 50, 200.0),
        flight("SBCC", 2022, 1, "A320", 50, 200.0),
    ];

    let buckets = aggregate_by_threshold_bucket(
        &flights,
        &airport_years,
        &BTreeSet::from([2022]),
        &[1_000.0, 2_000.0],
    )
    .unwrap();

    assert_eq!(2, buckets.len());
    assert_eq!(vec![id("SBAA")], buckets[0].airports);
    assert_eq!(4, buckets[0].flights);
    let share = |i: usize, category: &str| {
        buckets[i]
            .shares
            .iter()
            .find(|s| *s.category == *category)
            .map(|s| (s.flight_share, s.passenger_share))
            .unwrap()
    };
    assert_eq!((75.0, 0.0), share(0, "1B"));
    assert_eq!((25.0, 0.0), share(0, "4C"));

    assert_eq!((1_000.0, 2_000.0), (buckets[1].lower, buckets[1].upper));
    assert_eq!(2, buckets[1].flights);
    assert_eq!((100.0, 100.0), share(1, "4C"));
}

#[test]
fn test_bucket_thresholds_must_increase() {
    let result = aggregate_by_threshold_bucket(&[], &[], &BTreeSet::new(), &[]);
    assert!(matches!(result, Err(FaixaError::EmptyBoundaries)));
    let result = aggregate_by_threshold_bucket(&[], &[], &BTreeSet::new(), &[5.0, 5.0]);
    assert!(matches!(result, Err(FaixaError::EmptyBoundaries)));
    let result = aggregate_by_threshold_bucket(&[], &[], &BTreeSet::new(), &[5.0]);
    assert!(result.unwrap().is_empty());
}
