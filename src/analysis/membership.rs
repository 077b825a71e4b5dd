use crate::airport::{AirportCode, ClassifiedAirportYear};
use crate::flight::FlightRecord;
use crate::period::Period;
use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// `(year, tier) -> airports` built from classified yearly records.
///
/// The index is always rebuilt as a whole from the current classification.
#[derive(Clone, Debug, Default)]
pub struct MembershipIndex {
    members: HashMap<(i32, Arc<str>), BTreeSet<AirportCode>>,
}

impl MembershipIndex {
    pub fn build(classified: &[ClassifiedAirportYear]) -> MembershipIndex {
        let mut members: HashMap<(i32, Arc<str>), BTreeSet<AirportCode>> = HashMap::new();
        classified.iter().for_each(|r| {
            members
                .entry((r.year, r.tier.clone()))
                .or_default()
                .insert(r.airport.clone());
        });
        debug!("membership index built with {} (year, tier) keys", members.len());
        MembershipIndex { members }
    }

    pub fn airports(&self, year: i32, tier: &str) -> Option<&BTreeSet<AirportCode>> {
        self.members.get(&(year, Arc::from(tier)))
    }

    pub fn airports_per_year(&self, tier: &str) -> Vec<(i32, usize)> {
        let mut counts = self
            .members
            .iter()
            .filter(|((_, label), _)| **label == *tier)
            .map(|((year, _), airports)| (*year, airports.len()))
            .collect::<Vec<_>>();
        counts.sort();
        counts
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Keeps the flights of airports that belonged to `tier` in the year of each
/// flight's own period. Output is ordered chronologically by period.
pub fn resolve_membership(
    tier: &str,
    flights: &[FlightRecord],
    index: &MembershipIndex,
) -> Vec<FlightRecord> {
    let mut by_period: BTreeMap<Period, Vec<&FlightRecord>> = BTreeMap::new();
    flights
        .iter()
        .for_each(|f| by_period.entry(f.period()).or_default().push(f));

    let resolved = by_period
        .into_iter()
        .flat_map(|(period, records)| {
            let members = index.airports(period.year, tier);
            records
                .into_iter()
                .filter(move |f| members.is_some_and(|m| m.contains(&f.airport)))
                .cloned()
        })
        .collect::<Vec<FlightRecord>>();

    debug!(
        "{} of {} flight records resolved into {}",
        resolved.len(),
        flights.len(),
        tier
    );
    resolved
}
