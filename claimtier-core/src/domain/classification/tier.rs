// claimtier-core/src/domain/classification/tier.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final bucket of a claim. Exactly one per record, assigned once per batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    /// Passed every rule and sits inside its group's distribution.
    Gold,
    /// Failed at least one data-quality rule.
    Silver,
    /// Rule-clean but statistically anomalous; held for review.
    Quarantine,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Gold, Tier::Silver, Tier::Quarantine];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gold => "GOLD",
            Self::Silver => "SILVER",
            Self::Quarantine => "QUARANTINE",
        }
    }

    /// Directory name of the partition written for this tier.
    pub fn partition_name(&self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Quarantine => "quarantine",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GOLD" => Ok(Self::Gold),
            "SILVER" => Ok(Self::Silver),
            "QUARANTINE" => Ok(Self::Quarantine),
            _ => Err(format!("Unknown tier: {}", s)),
        }
    }
}
