use crate::aircraft::{AircraftCode, Category, UNKNOWN_CATEGORY, compare_categories};
use crate::airport::{AirportCode, AirportYear, ClassifiedAirportYear};
use crate::analysis::tiers::compare_tiers;
use crate::error::{FaixaError, Result};
use crate::flight::FlightRecord;
use crate::period::Period;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tabled::Tabled;

/// `numerator / denominator * 100`, or 0 when the denominator is 0.
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator * 100.0
    }
}

fn by_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct DistributionRow {
    pub tier: Arc<str>,
    pub year: i32,
    pub airports: usize,
    pub mean: f64,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

pub fn distribution(classified: &[ClassifiedAirportYear]) -> Vec<DistributionRow> {
    let mut groups: BTreeMap<(Arc<str>, i32), Vec<f64>> = BTreeMap::new();
    classified.iter().for_each(|r| {
        groups
            .entry((r.tier.clone(), r.year))
            .or_default()
            .push(r.passengers)
    });

    let mut rows = groups
        .into_iter()
        .map(|((tier, year), values)| {
            let total = values.iter().sum::<f64>();
            DistributionRow {
                tier,
                year,
                airports: values.len(),
                mean: total / values.len() as f64,
                total,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| compare_tiers(&a.tier, &b.tier).then(a.year.cmp(&b.year)));
    rows
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct RankedAirport {
    pub rank: usize,
    pub airport: AirportCode,
    pub passengers: f64,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct TierExplore {
    pub airports: Vec<RankedAirport>,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Share of the year's passengers held by the tier, in percent.
    pub share: f64,
}

/// Airports of one tier in one year, busiest first; equal counts are ranked
/// by airport code.
pub fn explore(classified: &[ClassifiedAirportYear], tier: &str, year: i32) -> TierExplore {
    let mut members = classified
        .iter()
        .filter(|r| r.year == year && *r.tier == *tier)
        .collect::<Vec<_>>();
    if members.is_empty() {
        return TierExplore::default();
    }
    members.sort_by(|a, b| by_desc(a.passengers, b.passengers).then(a.airport.cmp(&b.airport)));

    let total = members.iter().map(|r| r.passengers).sum::<f64>();
    let year_total = classified
        .iter()
        .filter(|r| r.year == year)
        .map(|r| r.passengers)
        .sum::<f64>();

    TierExplore {
        mean: total / members.len() as f64,
        min: members.iter().map(|r| r.passengers).fold(f64::INFINITY, f64::min),
        max: members
            .iter()
            .map(|r| r.passengers)
            .fold(f64::NEG_INFINITY, f64::max),
        share: percentage(total, year_total),
        total,
        airports: members
            .into_iter()
            .enumerate()
            .map(|(i, r)| RankedAirport {
                rank: i + 1,
                airport: r.airport.clone(),
                passengers: r.passengers,
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct PeriodAircraftRow {
    pub period: Period,
    pub aircraft: AircraftCode,
    pub flights: u64,
    pub passengers: f64,
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct AircraftTotal {
    pub rank: usize,
    pub aircraft: AircraftCode,
    pub flights: u64,
    pub passengers: f64,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct PeriodAircraftSummary {
    pub rows: Vec<PeriodAircraftRow>,
    pub top: Vec<AircraftTotal>,
}

/// Sums flights and passengers per (period, aircraft), keeping the `top_n`
/// busiest aircraft (all of them when `None`).
pub fn aggregate_by_period_aircraft(
    records: &[FlightRecord],
    top_n: Option<usize>,
) -> PeriodAircraftSummary {
    let mut cells: BTreeMap<(Period, AircraftCode), (u64, f64)> = BTreeMap::new();
    let mut totals: HashMap<AircraftCode, (u64, f64)> = HashMap::new();
    records.iter().for_each(|r| {
        let cell = cells.entry((r.period(), r.aircraft.clone())).or_default();
        cell.0 += r.flights;
        cell.1 += r.passengers;
        let total = totals.entry(r.aircraft.clone()).or_default();
        total.0 += r.flights;
        total.1 += r.passengers;
    });

    let mut ranked = totals.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|(a_code, (a_fl, a_pax)), (b_code, (b_fl, b_pax))| {
        b_fl.cmp(a_fl)
            .then(by_desc(*a_pax, *b_pax))
            .then(a_code.cmp(b_code))
    });
    ranked.truncate(top_n.unwrap_or(usize::MAX));

    let kept = ranked
        .iter()
        .map(|(code, _)| code.clone())
        .collect::<BTreeSet<AircraftCode>>();

    PeriodAircraftSummary {
        rows: cells
            .into_iter()
            .filter(|((_, aircraft), _)| kept.contains(aircraft))
            .map(|((period, aircraft), (flights, passengers))| PeriodAircraftRow {
                period,
                aircraft,
                flights,
                passengers,
            })
            .collect(),
        top: ranked
            .into_iter()
            .enumerate()
            .map(|(i, (aircraft, (flights, passengers)))| AircraftTotal {
                rank: i + 1,
                aircraft,
                flights,
                passengers,
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct AirportActivity {
    pub rank: usize,
    pub airport: AirportCode,
    pub flights: u64,
    pub passengers: f64,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AircraftDetail {
    pub airports: Vec<AirportActivity>,
    pub flights: u64,
    pub passengers: f64,
    pub mean_flights: f64,
}

pub fn aircraft_detail(records: &[FlightRecord], aircraft: &str, period: Period) -> AircraftDetail {
    let mut per_airport: BTreeMap<AirportCode, (u64, f64)> = BTreeMap::new();
    records
        .iter()
        .filter(|r| *r.aircraft == *aircraft && r.period() == period)
        .for_each(|r| {
            let entry = per_airport.entry(r.airport.clone()).or_default();
            entry.0 += r.flights;
            entry.1 += r.passengers;
        });

    let mut rows = per_airport.into_iter().collect::<Vec<_>>();
    rows.sort_by(|(a_code, (a_fl, _)), (b_code, (b_fl, _))| b_fl.cmp(a_fl).then(a_code.cmp(b_code)));

    let flights = rows.iter().map(|(_, (f, _))| *f).sum::<u64>();
    let passengers = rows.iter().map(|(_, (_, p))| *p).sum::<f64>();
    let mean_flights = if rows.is_empty() {
        0.0
    } else {
        flights as f64 / rows.len() as f64
    };

    AircraftDetail {
        airports: rows
            .into_iter()
            .enumerate()
            .map(|(i, (airport, (flights, passengers)))| AirportActivity {
                rank: i + 1,
                airport,
                flights,
                passengers,
            })
            .collect(),
        flights,
        passengers,
        mean_flights,
    }
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct UtilizationRow {
    pub period: Period,
    pub aircraft: AircraftCode,
    pub airports_using: usize,
    pub airports_active: usize,
    pub percentage: f64,
}

/// Share of the active airports of each period that flew each aircraft type.
pub fn utilization_by_period(records: &[FlightRecord]) -> Vec<UtilizationRow> {
    let mut active: BTreeMap<Period, BTreeSet<&AirportCode>> = BTreeMap::new();
    let mut using: BTreeMap<(Period, AircraftCode), BTreeSet<&AirportCode>> = BTreeMap::new();
    records.iter().for_each(|r| {
        active.entry(r.period()).or_default().insert(&r.airport);
        if r.flights > 0 {
            using
                .entry((r.period(), r.aircraft.clone()))
                .or_default()
                .insert(&r.airport);
        }
    });

    using
        .into_iter()
        .map(|((period, aircraft), airports)| {
            let airports_active = active.get(&period).map_or(0, |a| a.len());
            UtilizationRow {
                period,
                aircraft,
                airports_using: airports.len(),
                airports_active,
                percentage: percentage(airports.len() as f64, airports_active as f64),
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct UtilizationAverage {
    pub rank: usize,
    pub aircraft: AircraftCode,
    pub mean_percentage: f64,
}

pub fn top_utilization(rows: &[UtilizationRow], top_n: Option<usize>) -> Vec<UtilizationAverage> {
    let mut sums: HashMap<&AircraftCode, (f64, usize)> = HashMap::new();
    rows.iter().for_each(|r| {
        let entry = sums.entry(&r.aircraft).or_default();
        entry.0 += r.percentage;
        entry.1 += 1;
    });

    let mut ranked = sums
        .into_iter()
        .map(|(aircraft, (sum, n))| (aircraft.clone(), sum / n as f64))
        .collect::<Vec<_>>();
    ranked.sort_by(|(a_code, a), (b_code, b)| by_desc(*a, *b).then(a_code.cmp(b_code)));

    ranked
        .into_iter()
        .take(top_n.unwrap_or(usize::MAX))
        .enumerate()
        .map(|(i, (aircraft, mean_percentage))| UtilizationAverage {
            rank: i + 1,
            aircraft,
            mean_percentage,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct CategoryShare {
    pub category: Category,
    pub flights: u64,
    pub flight_share: f64,
    pub passengers: f64,
    pub passenger_share: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBucket {
    /// Exclusive lower bound.
    pub lower: f64,
    /// Inclusive upper bound.
    pub upper: f64,
    pub airports: Vec<AirportCode>,
    pub flights: u64,
    pub passengers: f64,
    pub shares: Vec<CategoryShare>,
}

/// Fleet composition by airport size.
///
/// Flights of `years` are matched to their airport's passenger count for the
/// same year and bucketed by `thresholds[i - 1] < passengers <= thresholds[i]`
/// (the first bucket starts above 0). Every bucket with flights lists every
/// category, zero-filled.
pub fn aggregate_by_threshold_bucket(
    flights: &[FlightRecord],
    airport_years: &[AirportYear],
    years: &BTreeSet<i32>,
    thresholds: &[f64],
) -> Result<Vec<CategoryBucket>> {
    if thresholds.is_empty() || thresholds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(FaixaError::EmptyBoundaries);
    }

    let passengers_of = airport_years
        .iter()
        .filter(|r| years.contains(&r.year))
        .map(|r| ((r.airport.clone(), r.year), r.passengers))
        .collect::<HashMap<(AirportCode, i32), f64>>();

    let joined = flights
        .iter()
        .filter(|f| years.contains(&f.year))
        .filter_map(|f| {
            passengers_of
                .get(&(f.airport.clone(), f.year))
                .map(|pax| (f, *pax))
        })
        .collect::<Vec<_>>();

    let category_of = |f: &FlightRecord| -> Category {
        f.category
            .clone()
            .unwrap_or_else(|| Arc::from(UNKNOWN_CATEGORY))
    };

    let mut categories = crate::aircraft::CANONICAL_CATEGORIES
        .iter()
        .map(|c| Arc::from(*c))
        .chain(joined.iter().map(|(f, _)| category_of(*f)))
        .collect::<BTreeSet<Category>>()
        .into_iter()
        .collect::<Vec<_>>();
    categories.sort_by(|a, b| compare_categories(a, b));

    let buckets = std::iter::once(0.0)
        .chain(thresholds.iter().copied())
        .zip(thresholds.iter().copied())
        .filter_map(|(lower, upper)| {
            let in_range = joined
                .iter()
                .filter(|(_, pax)| *pax > lower && *pax <= upper)
                .map(|(f, _)| *f)
                .collect::<Vec<&FlightRecord>>();
            let flights = in_range.iter().map(|f| f.flights).sum::<u64>();
            if flights == 0 {
                return None;
            }
            let passengers = in_range.iter().map(|f| f.passengers).sum::<f64>();

            let mut per_category: HashMap<Category, (u64, f64)> = HashMap::new();
            in_range.iter().for_each(|f| {
                let entry = per_category.entry(category_of(*f)).or_default();
                entry.0 += f.flights;
                entry.1 += f.passengers;
            });

            Some(CategoryBucket {
                lower,
                upper,
                airports: in_range
                    .iter()
                    .map(|f| f.airport.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                flights,
                passengers,
                shares: categories
                    .iter()
                    .map(|category| {
                        let (cat_flights, cat_passengers) =
                            per_category.get(category).copied().unwrap_or_default();
                        CategoryShare {
                            category: category.clone(),
                            flights: cat_flights,
                            flight_share: percentage(cat_flights as f64, flights as f64),
                            passengers: cat_passengers,
                            passenger_share: percentage(cat_passengers, passengers),
                        }
                    })
                    .collect(),
            })
        })
        .collect();

    Ok(buckets)
}
