use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabled::Tabled;

pub type AirportCode = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub struct AirportYear {
    pub airport: AirportCode,
    pub year: i32,
    pub passengers: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Tabled)]
pub struct ClassifiedAirportYear {
    pub airport: AirportCode,
    pub year: i32,
    pub passengers: f64,
    pub tier: Arc<str>,
}
