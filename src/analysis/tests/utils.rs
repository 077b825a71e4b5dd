use crate::aircraft::category_of;
use crate::airport::{AirportYear, ClassifiedAirportYear};
use crate::flight::FlightRecord;
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn airport_year(airport: &str, year: i32, passengers: f64) -> AirportYear {
    AirportYear {
        airport: id(airport),
        year,
        passengers,
    }
}

pub fn classified(airport: &str, year: i32, passengers: f64, tier: &str) -> ClassifiedAirportYear {
    ClassifiedAirportYear {
        airport: id(airport),
        year,
        passengers,
        tier: id(tier),
    }
}

pub fn flight(
    airport: &str,
    year: i32,
    month: u8,
    aircraft: &str,
    flights: u64,
    passengers: f64,
) -> FlightRecord {
    FlightRecord {
        airport: id(airport),
        year,
        month,
        aircraft: id(aircraft),
        flights,
        passengers,
        category: category_of(aircraft).map(id),
    }
}

pub fn with_category(mut record: FlightRecord, category: &str) -> FlightRecord {
    record.category = Some(id(category));
    record
}

pub fn arb_code(prefix: &'static str) -> impl Strategy<Value = Arc<str>> {
    prop_oneof![
        Just(Arc::from(format!("{}_1", prefix))),
        Just(Arc::from(format!("{}_2", prefix))),
        Just(Arc::from(format!("{}_3", prefix))),
    ]
}

pub fn arb_airport_year() -> impl Strategy<Value = AirportYear> {
    (arb_code("AP"), 2019..2025i32, 0..20_000_000u64).prop_map(|(airport, year, passengers)| {
        AirportYear {
            airport,
            year,
            passengers: passengers as f64,
        }
    })
}

pub fn arb_flight() -> impl Strategy<Value = FlightRecord> {
    (
        arb_code("AP"),
        2019..2025i32,
        1..=12u8,
        arb_code("AC"),
        0..500u64,
        0..50_000u64,
    )
        .prop_map(|(airport, year, month, aircraft, flights, passengers)| FlightRecord {
            airport,
            year,
            month,
            aircraft,
            flights,
            passengers: passengers as f64,
            category: None,
        })
}

/// Strictly increasing positive thresholds for `count` tiers.
pub fn arb_thresholds() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(1..5_000_000u64, 3..=11).prop_map(|steps| {
        steps
            .iter()
            .scan(0.0, |acc, step| {
                *acc += *step as f64;
                Some(*acc)
            })
            .collect()
    })
}
