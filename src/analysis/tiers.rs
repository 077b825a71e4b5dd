use crate::airport::{AirportYear, ClassifiedAirportYear};
use crate::error::{FaixaError, Result};
use log::warn;
use std::cmp::Ordering;
use std::sync::Arc;

pub const FLOOR_TIER: &str = "Faixa_AvG";
pub const UNDEFINED_TIER: &str = "Undefined";
const TIER_PREFIX: &str = "Faixa_";

pub const MIN_TIERS: usize = 3;
pub const MAX_TIERS: usize = 11;

const DEFAULT_BINS: [f64; 11] = [
    0.0,
    2_000.0,
    30_000.0,
    50_000.0,
    200_000.0,
    500_000.0,
    1_000_000.0,
    2_000_000.0,
    5_000_000.0,
    10_000_000.0,
    15_000_000.0,
];

const SUGGESTED_THRESHOLDS: [f64; MAX_TIERS] = [
    2_000.0,
    30_000.0,
    50_000.0,
    200_000.0,
    500_000.0,
    1_000_000.0,
    2_000_000.0,
    5_000_000.0,
    10_000_000.0,
    15_000_000.0,
    25_000_000.0,
];

/// Partition of the passenger axis into labelled tiers.
///
/// `bins` has one more entry than `labels`: it starts at 0, ends at +inf and
/// is strictly increasing. Label `i` covers `[bins[i], bins[i + 1])`.
#[derive(Clone, Debug, PartialEq)]
pub struct TierDefinition {
    bins: Vec<f64>,
    labels: Vec<Arc<str>>,
}

pub fn tier_label(n: usize) -> String {
    format!("{}{}", TIER_PREFIX, n)
}

pub fn suggested_thresholds(count: usize) -> Vec<f64> {
    SUGGESTED_THRESHOLDS
        .iter()
        .take(count.min(MAX_TIERS))
        .copied()
        .collect()
}

impl TierDefinition {
    pub fn default_tiers() -> TierDefinition {
        let mut bins = DEFAULT_BINS.to_vec();
        bins.push(f64::INFINITY);
        let labels = Self::labels_for(DEFAULT_BINS.len() - 1);
        TierDefinition { bins, labels }
    }

    /// Builds `count` numbered tiers above the floor tier from `count`
    /// strictly increasing positive thresholds.
    pub fn build(count: usize, thresholds: &[f64]) -> Result<TierDefinition> {
        if !(MIN_TIERS..=MAX_TIERS).contains(&count) {
            return Err(FaixaError::TierCount { count });
        }
        if thresholds.len() != count {
            return Err(FaixaError::ThresholdCount {
                expected: count,
                actual: thresholds.len(),
            });
        }
        for (index, value) in thresholds.iter().copied().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(FaixaError::InvalidThreshold { index, value });
            }
            if index > 0 && value <= thresholds[index - 1] {
                return Err(FaixaError::NonMonotonicThresholds {
                    index,
                    previous: thresholds[index - 1],
                    value,
                });
            }
        }

        let mut bins = Vec::with_capacity(count + 2);
        bins.push(0.0);
        bins.extend_from_slice(thresholds);
        bins.push(f64::INFINITY);

        Ok(TierDefinition {
            bins,
            labels: Self::labels_for(count),
        })
    }

    fn labels_for(count: usize) -> Vec<Arc<str>> {
        std::iter::once(Arc::from(FLOOR_TIER))
            .chain((1..=count).map(|n| Arc::from(tier_label(n))))
            .collect()
    }

    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    pub fn labels(&self) -> &[Arc<str>] {
        &self.labels
    }

    pub fn count(&self) -> usize {
        self.labels.len() - 1
    }

    /// Resolves a user supplied label, accepting `3` as shorthand for `Faixa_3`
    /// and `AvG` for the floor tier.
    pub fn resolve_label(&self, input: &str) -> Result<Arc<str>> {
        let wanted = if input.chars().all(|c| c.is_ascii_digit()) || input == "AvG" {
            format!("{}{}", TIER_PREFIX, input)
        } else {
            input.to_string()
        };
        self.labels
            .iter()
            .find(|l| ***l == *wanted)
            .cloned()
            .ok_or(FaixaError::UnknownTier {
                label: input.to_string(),
            })
    }

    pub fn range_of(&self, label: &str) -> Option<(f64, f64)> {
        self.labels
            .iter()
            .position(|l| **l == *label)
            .map(|i| (self.bins[i], self.bins[i + 1]))
    }

    /// Returns the label of the first tier containing `passengers`, or
    /// [`UNDEFINED_TIER`] when none does (negative or NaN counts).
    pub fn classify(&self, passengers: f64) -> Arc<str> {
        let last = self.labels.len() - 1;
        self.labels
            .iter()
            .enumerate()
            .find(|(i, _)| {
                let lower = self.bins[*i];
                if *i == last {
                    passengers >= lower
                } else {
                    passengers >= lower && passengers < self.bins[i + 1]
                }
            })
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| Arc::from(UNDEFINED_TIER))
    }
}

/// Tags every record with its tier. Records that match no tier keep the
/// [`UNDEFINED_TIER`] label so they stay visible downstream.
pub fn classify_all(records: &[AirportYear], tiers: &TierDefinition) -> Vec<ClassifiedAirportYear> {
    records
        .iter()
        .map(|r| {
            let tier = tiers.classify(r.passengers);
            if *tier == *UNDEFINED_TIER {
                warn!(
                    "{} in {} has {} passengers, outside every tier",
                    r.airport, r.year, r.passengers
                );
            }
            ClassifiedAirportYear {
                airport: r.airport.clone(),
                year: r.year,
                passengers: r.passengers,
                tier,
            }
        })
        .collect()
}

/// Floor tier first, numbered tiers ascending, anything else alphabetically last.
pub fn compare_tiers(a: &str, b: &str) -> Ordering {
    fn key(label: &str) -> (u8, usize, &str) {
        if label == FLOOR_TIER {
            return (0, 0, label);
        }
        match label
            .strip_prefix(TIER_PREFIX)
            .and_then(|n| n.parse::<usize>().ok())
        {
            Some(n) => (1, n, label),
            None => (2, 0, label),
        }
    }
    key(a).cmp(&key(b))
}
