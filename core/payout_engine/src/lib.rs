//! # Payout Engine
//!
//! Payment distribution and aggregation core of the department
//! operations dashboard. Departments assign workers to projects with a
//! contribution tier (gold / silver / copper); this crate turns a
//! project's fixed amount into deterministic per-worker payment splits
//! and rolls those splits up into dashboard aggregates.
//!
//! | Concern        | Module                                       |
//! |----------------|----------------------------------------------|
//! | Tier model     | [`tiers`]                                    |
//! | Data model     | [`model`]                                    |
//! | Payment splits | [`distribution::compute_allocations`]        |
//! | Aggregates     | [`aggregate::build_category_aggregate`]      |
//! | Worker profile | [`profile::build_worker_profile`]            |
//! | Export rows    | [`report`]                                   |
//!
//! ## Architecture
//!
//! Every function here is a pure computation over a snapshot the caller
//! supplies: no I/O, no caching, no shared mutable state. Allocations
//! are derived on every call from the live amount and membership set —
//! they are deliberately never persisted, so reports can never show a
//! stale split. Persistence and HTTP live in the `dashboard_api` crate.

pub mod aggregate;
pub mod distribution;
pub mod error;
pub mod model;
pub mod profile;
pub mod report;
pub mod tiers;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_distribution;
#[cfg(test)]
mod test_profile;

pub use aggregate::{build_category_aggregate, CategoryAggregate};
pub use distribution::compute_allocations;
pub use error::{EngineError, Result};
pub use model::{
    CategorySelection, Department, Membership, Project, ProjectCategory, ProjectStatus, WorkType,
    Worker,
};
pub use profile::{build_worker_profile, WorkerProfile};
pub use tiers::ContributionTier;
