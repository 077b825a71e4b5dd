use crate::aircraft::AircraftCode;
use crate::airport::{AirportCode, AirportYear};
use crate::flight::FlightRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub trait AirportYearKey {
    fn airport(&self) -> &str;
    fn year(&self) -> i32;
}

impl AirportYearKey for AirportYear {
    fn airport(&self) -> &str {
        &self.airport
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl AirportYearKey for FlightRecord {
    fn airport(&self) -> &str {
        &self.airport
    }

    fn year(&self) -> i32 {
        self.year
    }
}

/// Airports and the years in which they are left out of every analysis.
/// An airport with no years is never excluded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(BTreeMap<AirportCode, BTreeSet<i32>>);

impl ExclusionSet {
    pub fn new() -> ExclusionSet {
        ExclusionSet::default()
    }

    pub fn exclude<I: IntoIterator<Item = i32>>(&mut self, airport: AirportCode, years: I) {
        self.0.entry(airport).or_default().extend(years);
    }

    pub fn include(&mut self, airport: &str) -> bool {
        self.0.remove(airport).is_some()
    }

    pub fn is_excluded(&self, airport: &str, year: i32) -> bool {
        self.0
            .get(airport)
            .is_some_and(|years| years.contains(&year))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AirportCode, &BTreeSet<i32>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|years| years.is_empty())
    }
}

pub fn filter_with<T, F>(records: &[T], exclusions: &ExclusionSet, keep: F) -> Vec<T>
where
    T: AirportYearKey + Clone,
    F: Fn(&T) -> bool,
{
    records
        .iter()
        .filter(|r| !exclusions.is_excluded(r.airport(), r.year()))
        .filter(|r| keep(*r))
        .cloned()
        .collect()
}

pub fn filter_excluded<T: AirportYearKey + Clone>(records: &[T], exclusions: &ExclusionSet) -> Vec<T> {
    filter_with(records, exclusions, |_| true)
}

/// Flight view of the exclusion filter: the same airport-year rule as the
/// yearly table, plus aircraft types that are always dropped.
pub fn filter_flights(
    records: &[FlightRecord],
    exclusions: &ExclusionSet,
    excluded_aircraft: &BTreeSet<AircraftCode>,
) -> Vec<FlightRecord> {
    filter_with(records, exclusions, |f| !excluded_aircraft.contains(&f.aircraft))
}
