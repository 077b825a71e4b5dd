use crate::aircraft::AircraftCode;
use crate::airport::AirportCode;
use crate::analysis::exclusion::ExclusionSet;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub exclusions: ExclusionSet,
    pub excluded_aircraft: BTreeSet<AircraftCode>,
    /// Custom tier thresholds; the default tiers are used when absent.
    pub tier_thresholds: Option<Vec<f64>>,
    pub bucket_thresholds: Vec<f64>,
    /// First year whose passenger count is a projection rather than observed.
    pub projection_year: i32,
    /// Airports excluded in every year by `exclude default`.
    pub default_exclusions: Vec<AirportCode>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            exclusions: ExclusionSet::new(),
            excluded_aircraft: BTreeSet::from([Arc::from("E110")]),
            tier_thresholds: None,
            bucket_thresholds: vec![
                1_000.1,
                3_000.0,
                6_500.0,
                12_000.0,
                19_500.0,
                30_000.0,
                50_000.0,
                79_000.0,
                150_000.0,
                310_000.0,
                600_000.0,
                2_000_000.0,
                4_000_000.0,
                10_000_000.0,
                15_000_000.0,
                50_000_000.0,
            ],
            projection_year: 2025,
            default_exclusions: [
                "SBGV", "SBIL", "SBJV", "SBKG", "SBME", "SBML", "SBPB", "SBPP", "SBRJ", "SBRP",
                "SBSM", "SBSP", "SBSR", "SBTC", "SBTE", "SBUA", "SBUG", "SBUR", "SBUY", "SIRI",
                "SISO", "SNCL", "SNRJ", "SNTI", "SSCT", "SSUV", "SWCA", "SBJR", "SBMI", "SBCO",
                "SBSJ", "SBIP",
            ]
            .iter()
            .map(|s| Arc::from(*s))
            .collect(),
        }
    }
}

impl SessionConfig {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
