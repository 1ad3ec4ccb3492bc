//! Contribution tier model.
//!
//! A worker's involvement in a project is classified as gold, silver or
//! copper. The integer weights only matter to the weighted fallback rule
//! of the distribution engine; the named tier combinations (gold-only,
//! gold+silver, gold+copper) use fixed percentage splits instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Contribution tier of one project membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionTier {
    Gold,
    Silver,
    Copper,
}

impl ContributionTier {
    pub const ALL: [ContributionTier; 3] = [Self::Gold, Self::Silver, Self::Copper];

    /// Relative weight used by the weighted fallback split.
    pub fn weight(self) -> u32 {
        match self {
            Self::Gold => 3,
            Self::Silver => 2,
            Self::Copper => 1,
        }
    }

    /// Short identifier string suitable for storage in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Copper => "copper",
        }
    }
}

impl FromStr for ContributionTier {
    type Err = EngineError;

    /// Parse a stored tier string. Unrecognised values are a hard error:
    /// the engine must never guess a weight for a corrupt tier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "copper" => Ok(Self::Copper),
            other => Err(EngineError::UnknownTier(other.to_string())),
        }
    }
}

impl fmt::Display for ContributionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
