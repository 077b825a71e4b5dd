use crate::aircraft::category_of;
use crate::airport::{AirportCode, AirportYear};
use crate::error::Result;
use crate::flight::FlightRecord;
use log::{info, warn};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub airport_years: Vec<AirportYear>,
    pub flights: Vec<FlightRecord>,
}

impl Dataset {
    pub fn new(airport_years: Vec<AirportYear>, mut flights: Vec<FlightRecord>, projection_year: i32) -> Dataset {
        fill_categories(&mut flights);
        let airport_years = merge_flight_totals(airport_years, &flights, projection_year);
        Dataset {
            airport_years,
            flights,
        }
    }

    pub fn load_from_file(path: &str, projection_year: i32) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawData {
            airport_years: Vec<AirportYear>,
            flights: Vec<FlightRecord>,
        }
        let raw: RawData = serde_json::from_str(&data)?;
        info!(
            "loaded {} airport-year rows and {} flight rows from {}",
            raw.airport_years.len(),
            raw.flights.len(),
            path
        );

        Ok(Dataset::new(raw.airport_years, raw.flights, projection_year))
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.airport_years.iter().map(|r| r.year).collect()
    }
}

/// Replaces the passenger count of every year before `projection_year` with
/// the sum of that airport's flight passengers (0 without flights). Later
/// years keep their projected value.
pub fn merge_flight_totals(
    airport_years: Vec<AirportYear>,
    flights: &[FlightRecord],
    projection_year: i32,
) -> Vec<AirportYear> {
    let mut observed: HashMap<(AirportCode, i32), f64> = HashMap::new();
    flights.iter().for_each(|f| {
        *observed.entry((f.airport.clone(), f.year)).or_default() += f.passengers;
    });

    airport_years
        .into_iter()
        .map(|r| {
            if r.year < projection_year {
                let passengers = observed
                    .get(&(r.airport.clone(), r.year))
                    .copied()
                    .unwrap_or(0.0);
                AirportYear { passengers, ..r }
            } else {
                r
            }
        })
        .collect()
}

pub fn fill_categories(flights: &mut [FlightRecord]) {
    let mut unmapped = BTreeSet::new();
    flights
        .iter_mut()
        .filter(|f| f.category.is_none())
        .for_each(|f| match category_of(&f.aircraft) {
            Some(category) => f.category = Some(Arc::from(category)),
            None => {
                unmapped.insert(f.aircraft.clone());
            }
        });
    if !unmapped.is_empty() {
        warn!(
            "no category for aircraft {:?}; they are reported as Unknown",
            unmapped
        );
    }
}
