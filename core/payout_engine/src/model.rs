//! # Model
//!
//! Shared data structures consumed by the distribution engine and the
//! aggregation layer.
//!
//! ## Design decisions
//!
//! ### Snapshots, not live records
//!
//! The engine and the aggregation layer are pure functions over whatever
//! membership/project snapshot the store hands them at call time.
//! Nothing here holds a connection or caches across calls — allocations
//! are always recomputed from the live tier/amount state, never stored.
//!
//! ### Category / amount invariant
//!
//! `company` projects are internal work and must not carry an amount;
//! every other category must. [`Project::validate`] enforces this at the
//! boundary so downstream code can treat `amount` as trustworthy.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::tiers::ContributionTier;

/// Business category of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    Client,
    Company,
    Internship,
    Academy,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 4] =
        [Self::Client, Self::Company, Self::Internship, Self::Academy];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Company => "company",
            Self::Internship => "internship",
            Self::Academy => "academy",
        }
    }

    /// Human-readable label used in report rows.
    pub fn label(self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::Company => "Company",
            Self::Internship => "Internship",
            Self::Academy => "Academy",
        }
    }
}

impl FromStr for ProjectCategory {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "client" => Ok(Self::Client),
            "company" => Ok(Self::Company),
            "internship" => Ok(Self::Internship),
            "academy" => Ok(Self::Academy),
            other => Err(EngineError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selection key for aggregation: a single category or the
/// department-wide view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySelection {
    All,
    One(ProjectCategory),
}

impl CategorySelection {
    /// `true` when `category` falls inside this selection.
    pub fn matches(self, category: ProjectCategory) -> bool {
        match self {
            Self::All => true,
            Self::One(c) => c == category,
        }
    }
}

impl FromStr for CategorySelection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "all" {
            Ok(Self::All)
        } else {
            Ok(Self::One(s.parse()?))
        }
    }
}

/// Whether a project is staffed by a single worker or a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Solo,
    Group,
}

impl WorkType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Group => "group",
        }
    }
}

impl FromStr for WorkType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "solo" => Ok(Self::Solo),
            "group" => Ok(Self::Group),
            other => Err(EngineError::UnknownWorkType(other.to_string())),
        }
    }
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Started,
    Ongoing,
    OnHold,
    Canceled,
    Finished,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Ongoing => "ongoing",
            Self::OnHold => "on_hold",
            Self::Canceled => "canceled",
            Self::Finished => "finished",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Started => "Started",
            Self::Ongoing => "Ongoing",
            Self::OnHold => "On Hold",
            Self::Canceled => "Canceled",
            Self::Finished => "Finished",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "started" => Ok(Self::Started),
            "ongoing" => Ok(Self::Ongoing),
            "on_hold" => Ok(Self::OnHold),
            "canceled" => Ok(Self::Canceled),
            "finished" => Ok(Self::Finished),
            other => Err(EngineError::UnknownStatus(other.to_string())),
        }
    }
}

/// A department account. Authentication lives outside this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A worker belonging to a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: i64,
    pub department_id: i64,
    pub name: String,
}

/// One worker's participation in one project, with the worker's name
/// joined in for reporting. A (project, worker) pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    pub project_id: i64,
    pub worker_id: i64,
    pub worker_name: String,
    pub tier: ContributionTier,
}

/// A project snapshot with its current membership set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub category: ProjectCategory,
    pub work_type: WorkType,
    pub start_date: NaiveDate,
    pub status: ProjectStatus,
    /// Required for every category except `company`, which must have none.
    pub amount: Option<Decimal>,
    pub members: Vec<Membership>,
}

impl Project {
    /// Check the category/amount invariant.
    pub fn validate(&self) -> Result<()> {
        match (self.category, self.amount) {
            (ProjectCategory::Company, Some(_)) => Err(EngineError::AmountNotAllowed(self.id)),
            (ProjectCategory::Company, None) => Ok(()),
            (_, None) => Err(EngineError::AmountRequired(self.id)),
            (_, Some(_)) => Ok(()),
        }
    }

    /// Amount treated as zero when absent, for income totals.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}
