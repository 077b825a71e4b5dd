pub mod aggregate;
pub mod exclusion;
pub mod membership;
pub mod presence;
pub mod tiers;
