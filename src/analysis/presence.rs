use crate::aircraft::AircraftCode;
use crate::airport::AirportCode;
use crate::flight::FlightRecord;
use crate::period::Period;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// Activity of every (airport, aircraft) pair over a common, chronologically
/// ordered period axis. A pair is active in a period when it has at least one
/// flight there; pairs that were never active are not stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresenceMatrix {
    pub periods: Vec<Period>,
    pub rows: BTreeMap<(AirportCode, AircraftCode), Vec<bool>>,
}

pub fn observed_periods(records: &[FlightRecord]) -> Vec<Period> {
    records
        .iter()
        .map(|r| r.period())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Restricts records to the selected airports and aircraft; `None` keeps all.
pub fn select(
    records: &[FlightRecord],
    airports: Option<&BTreeSet<AirportCode>>,
    aircraft: Option<&BTreeSet<AircraftCode>>,
) -> Vec<FlightRecord> {
    records
        .iter()
        .filter(|r| airports.is_none_or(|a| a.contains(&r.airport)))
        .filter(|r| aircraft.is_none_or(|a| a.contains(&r.aircraft)))
        .cloned()
        .collect()
}

pub fn compute_presence_matrix(records: &[FlightRecord], periods: &[Period]) -> PresenceMatrix {
    let mut periods = periods.to_vec();
    periods.sort();
    periods.dedup();

    let position = periods
        .iter()
        .enumerate()
        .map(|(i, p)| (*p, i))
        .collect::<BTreeMap<Period, usize>>();

    let mut rows: BTreeMap<(AirportCode, AircraftCode), Vec<bool>> = BTreeMap::new();
    records.iter().filter(|r| r.flights > 0).for_each(|r| {
        if let Some(i) = position.get(&r.period()) {
            rows.entry((r.airport.clone(), r.aircraft.clone()))
                .or_insert_with(|| vec![false; periods.len()])[*i] = true;
        }
    });
    rows.retain(|_, presence| presence.iter().any(|p| *p));

    PresenceMatrix { periods, rows }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StreakStats {
    pub max: usize,
    pub min: usize,
    pub mean: f64,
}

impl StreakStats {
    fn from_lengths(lengths: &[usize]) -> StreakStats {
        if lengths.is_empty() {
            return StreakStats::default();
        }
        StreakStats {
            max: lengths.iter().copied().max().unwrap_or(0),
            min: lengths.iter().copied().min().unwrap_or(0),
            mean: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunLengths {
    pub active: StreakStats,
    pub inactive: StreakStats,
}

/// Single pass over a presence sequence, closing a streak whenever the value flips.
pub fn run_lengths(presence: &[bool]) -> RunLengths {
    let mut active_runs = vec![];
    let mut inactive_runs = vec![];
    let mut active = 0usize;
    let mut inactive = 0usize;

    for present in presence {
        if *present {
            if inactive > 0 {
                inactive_runs.push(inactive);
                inactive = 0;
            }
            active += 1;
        } else {
            if active > 0 {
                active_runs.push(active);
                active = 0;
            }
            inactive += 1;
        }
    }
    if active > 0 {
        active_runs.push(active);
    }
    if inactive > 0 {
        inactive_runs.push(inactive);
    }

    RunLengths {
        active: StreakStats::from_lengths(&active_runs),
        inactive: StreakStats::from_lengths(&inactive_runs),
    }
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct StreakRow {
    pub airport: AirportCode,
    pub aircraft: AircraftCode,
    pub active_max: usize,
    pub active_min: usize,
    pub active_mean: f64,
    pub inactive_max: usize,
    pub inactive_min: usize,
    pub inactive_mean: f64,
}

/// Streak statistics of every active row, longest active streak first, then
/// by airport and aircraft.
pub fn compute_run_lengths(matrix: &PresenceMatrix) -> Vec<StreakRow> {
    let mut rows = matrix
        .rows
        .iter()
        .map(|((airport, aircraft), presence)| {
            let runs = run_lengths(presence);
            StreakRow {
                airport: airport.clone(),
                aircraft: aircraft.clone(),
                active_max: runs.active.max,
                active_min: runs.active.min,
                active_mean: runs.active.mean,
                inactive_max: runs.inactive.max,
                inactive_min: runs.inactive.min,
                inactive_mean: runs.inactive.mean,
            }
        })
        .filter(|r| r.active_max > 0)
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        b.active_max
            .cmp(&a.active_max)
            .then(a.airport.cmp(&b.airport))
            .then(a.aircraft.cmp(&b.aircraft))
    });
    rows
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Statistic {
    ActiveMax,
    ActiveMin,
    ActiveMean,
    InactiveMax,
    InactiveMin,
    InactiveMean,
}

impl Statistic {
    fn value(&self, row: &StreakRow) -> f64 {
        match self {
            Statistic::ActiveMax => row.active_max as f64,
            Statistic::ActiveMin => row.active_min as f64,
            Statistic::ActiveMean => row.active_mean,
            Statistic::InactiveMax => row.inactive_max as f64,
            Statistic::InactiveMin => row.inactive_min as f64,
            Statistic::InactiveMean => row.inactive_mean,
        }
    }
}

impl FromStr for Statistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active_max" => Ok(Statistic::ActiveMax),
            "active_min" => Ok(Statistic::ActiveMin),
            "active_mean" => Ok(Statistic::ActiveMean),
            "inactive_max" => Ok(Statistic::InactiveMax),
            "inactive_min" => Ok(Statistic::InactiveMin),
            "inactive_mean" => Ok(Statistic::InactiveMean),
            _ => Err(format!("unknown statistic: {}", s)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Greater,
    Less,
    Equal,
    GreaterOrEqual,
    LessOrEqual,
}

impl Comparison {
    fn holds(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Greater => lhs > rhs,
            Comparison::Less => lhs < rhs,
            Comparison::Equal => lhs == rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
            Comparison::LessOrEqual => lhs <= rhs,
        }
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Comparison::Greater),
            "<" => Ok(Comparison::Less),
            "=" | "==" => Ok(Comparison::Equal),
            ">=" => Ok(Comparison::GreaterOrEqual),
            "<=" => Ok(Comparison::LessOrEqual),
            _ => Err(format!("unknown operator: {}", s)),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::Equal => "=",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
        };
        write!(f, "{}", op)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreakFilter {
    pub statistic: Statistic,
    pub comparison: Comparison,
    pub value: f64,
}

impl StreakFilter {
    pub fn matches(&self, row: &StreakRow) -> bool {
        self.comparison.holds(self.statistic.value(row), self.value)
    }
}

pub fn apply_filters(rows: &[StreakRow], filters: &[StreakFilter]) -> Vec<StreakRow> {
    rows.iter()
        .filter(|r| filters.iter().all(|f| f.matches(r)))
        .cloned()
        .collect()
}

#[derive(Clone, Debug, PartialEq, Tabled)]
pub struct PairPeriodRow {
    pub airport: AirportCode,
    pub aircraft: AircraftCode,
    pub period: Period,
    pub flights: u64,
    pub passengers: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PairDetail {
    pub rows: Vec<PairPeriodRow>,
    pub flights: u64,
    pub passengers: f64,
    pub periods: usize,
}

/// Monthly flights and passengers of the given pairs, optionally narrowed to
/// one airport and/or one aircraft, ordered by airport, aircraft and period.
pub fn pair_detail(
    records: &[FlightRecord],
    pairs: &BTreeSet<(AirportCode, AircraftCode)>,
    airport: Option<&str>,
    aircraft: Option<&str>,
) -> PairDetail {
    let mut cells: BTreeMap<(AirportCode, AircraftCode, Period), (u64, f64)> = BTreeMap::new();
    records
        .iter()
        .filter(|r| airport.is_none_or(|a| *r.airport == *a))
        .filter(|r| aircraft.is_none_or(|a| *r.aircraft == *a))
        .filter(|r| pairs.contains(&(r.airport.clone(), r.aircraft.clone())))
        .for_each(|r| {
            let cell = cells
                .entry((r.airport.clone(), r.aircraft.clone(), r.period()))
                .or_default();
            cell.0 += r.flights;
            cell.1 += r.passengers;
        });

    let rows = cells
        .into_iter()
        .map(|((airport, aircraft, period), (flights, passengers))| PairPeriodRow {
            airport,
            aircraft,
            period,
            flights,
            passengers,
        })
        .collect::<Vec<_>>();

    PairDetail {
        flights: rows.iter().map(|r| r.flights).sum(),
        passengers: rows.iter().map(|r| r.passengers).sum(),
        periods: rows.iter().map(|r| r.period).collect::<BTreeSet<_>>().len(),
        rows,
    }
}
