use crate::aircraft::AircraftCode;
use crate::airport::{AirportCode, AirportYear, ClassifiedAirportYear};
use crate::analysis::exclusion::{ExclusionSet, filter_excluded, filter_flights};
use crate::analysis::membership::{MembershipIndex, resolve_membership};
use crate::analysis::tiers::{TierDefinition, classify_all};
use crate::config::SessionConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::flight::FlightRecord;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;

/// One analyst's state: the immutable source tables, the current
/// configuration and every table derived from them.
///
/// Derived tables are recomputed as a whole after each configuration change.
pub struct Session {
    dataset: Dataset,
    exclusions: ExclusionSet,
    excluded_aircraft: BTreeSet<AircraftCode>,
    tiers: TierDefinition,
    bucket_thresholds: Vec<f64>,
    default_exclusions: Vec<AirportCode>,
    airport_years: Vec<AirportYear>,
    flights: Vec<FlightRecord>,
    classified: Vec<ClassifiedAirportYear>,
    index: MembershipIndex,
}

impl Session {
    pub fn new(dataset: Dataset, config: SessionConfig) -> Result<Session> {
        let tiers = match &config.tier_thresholds {
            Some(thresholds) => TierDefinition::build(thresholds.len(), thresholds)?,
            None => TierDefinition::default_tiers(),
        };
        let mut session = Session {
            dataset,
            exclusions: config.exclusions,
            excluded_aircraft: config.excluded_aircraft,
            tiers,
            bucket_thresholds: config.bucket_thresholds,
            default_exclusions: config.default_exclusions,
            airport_years: vec![],
            flights: vec![],
            classified: vec![],
            index: MembershipIndex::default(),
        };
        session.recompute();
        Ok(session)
    }

    fn recompute(&mut self) {
        self.airport_years = filter_excluded(&self.dataset.airport_years, &self.exclusions);
        self.flights = filter_flights(&self.dataset.flights, &self.exclusions, &self.excluded_aircraft);
        self.classified = classify_all(&self.airport_years, &self.tiers);
        self.index = MembershipIndex::build(&self.classified);
        debug!(
            "recomputed: {}/{} airport-year rows, {}/{} flight rows after exclusions, {} (year, tier) groups",
            self.airport_years.len(),
            self.dataset.airport_years.len(),
            self.flights.len(),
            self.dataset.flights.len(),
            self.index.len()
        );
        if self.index.is_empty() && !self.dataset.airport_years.is_empty() {
            warn!("every airport-year row is excluded");
        }
    }

    pub fn set_tiers(&mut self, count: usize, thresholds: &[f64]) -> Result<()> {
        self.tiers = TierDefinition::build(count, thresholds)?;
        info!("using {} custom tiers: {:?}", count, thresholds);
        self.recompute();
        Ok(())
    }

    pub fn reset_tiers(&mut self) {
        self.tiers = TierDefinition::default_tiers();
        info!("using default tiers");
        self.recompute();
    }

    /// Excludes `airport` in `years`, or in every year of the dataset when empty.
    pub fn exclude(&mut self, airport: &str, years: Vec<i32>) {
        let years = if years.is_empty() {
            self.dataset.years().into_iter().collect()
        } else {
            years
        };
        info!("excluding {} in {:?}", airport, years);
        self.exclusions.exclude(Arc::from(airport), years);
        self.recompute();
    }

    pub fn exclude_defaults(&mut self) {
        let years = self.dataset.years();
        self.default_exclusions.iter().for_each(|airport| {
            self.exclusions
                .exclude(airport.clone(), years.iter().copied())
        });
        info!("applied {} default exclusions", self.default_exclusions.len());
        self.recompute();
    }

    pub fn include(&mut self, airport: &str) -> bool {
        let removed = self.exclusions.include(airport);
        if removed {
            info!("{} is no longer excluded", airport);
            self.recompute();
        }
        removed
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn bucket_thresholds(&self) -> &[f64] {
        &self.bucket_thresholds
    }

    pub fn tiers(&self) -> &TierDefinition {
        &self.tiers
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.dataset.years()
    }

    pub fn airport_years(&self) -> &[AirportYear] {
        &self.airport_years
    }

    pub fn flights(&self) -> &[FlightRecord] {
        &self.flights
    }

    pub fn classified(&self) -> &[ClassifiedAirportYear] {
        &self.classified
    }

    pub fn membership(&self) -> &MembershipIndex {
        &self.index
    }

    /// Flights of the airports that held `tier` in each flight's own year.
    pub fn tier_flights(&self, tier: &str) -> Result<(Arc<str>, Vec<FlightRecord>)> {
        let label = self.tiers.resolve_label(tier)?;
        let flights = resolve_membership(&label, &self.flights, &self.index);
        Ok((label, flights))
    }
}
