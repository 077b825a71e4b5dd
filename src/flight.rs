use crate::aircraft::{AircraftCode, Category};
use crate::airport::AirportCode;
use crate::period::Period;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub airport: AirportCode,
    pub year: i32,
    pub month: u8,
    pub aircraft: AircraftCode,
    pub flights: u64,
    pub passengers: f64,
    #[serde(default)]
    pub category: Option<Category>,
}

impl FlightRecord {
    pub fn period(&self) -> Period {
        Period::new(self.year, self.month)
    }
}
