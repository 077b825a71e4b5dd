use crate::error::FaixaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month used as the time-series key. Ordering is chronological
/// because `year` is compared before `month`.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
pub struct Period {
    pub year: i32,
    pub month: u8,
}

impl Period {
    pub fn new(year: i32, month: u8) -> Period {
        Period { year, month }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-M{}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = FaixaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FaixaError::InvalidPeriod {
            input: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month = month.strip_prefix('M').unwrap_or(month);
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u8>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Period::new(year, month))
    }
}
