//! Worker performance profile.
//!
//! Combines a worker's raw activity metrics into 0–100 scores, each
//! normalised against the highest value any worker in the department
//! reaches for that metric. A worker with no memberships scores zero
//! across the board rather than erroring.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::distribution::{compute_allocations, round_currency};
use crate::model::{Project, ProjectStatus, WorkType, Worker};

/// Raw per-worker activity numbers before normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMetrics {
    /// Distinct projects the worker participates in.
    pub project_count: Decimal,
    /// Total engine-computed income.
    pub income: Decimal,
    /// Share of the worker's projects that are finished.
    pub finished_ratio: Decimal,
    /// Average amount across the worker's projects.
    pub avg_amount: Decimal,
    /// Share of the worker's projects that are group work.
    pub group_ratio: Decimal,
}

/// Normalised 0–100 scores, one per metric, plus their mean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileScores {
    pub project_count: Decimal,
    pub income: Decimal,
    pub finished_ratio: Decimal,
    pub avg_amount: Decimal,
    pub group_ratio: Decimal,
    pub overall: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerProfile {
    pub worker_id: i64,
    pub name: String,
    pub metrics: RawMetrics,
    pub scores: ProfileScores,
}

#[derive(Default)]
struct Accumulator {
    projects: u64,
    income: Decimal,
    finished: u64,
    amount_sum: Decimal,
    group: u64,
}

impl Accumulator {
    fn metrics(&self) -> RawMetrics {
        let count = Decimal::from(self.projects);
        if self.projects == 0 {
            return RawMetrics::default();
        }
        RawMetrics {
            project_count: count,
            income: self.income,
            finished_ratio: Decimal::from(self.finished) / count,
            avg_amount: round_currency(self.amount_sum / count),
            group_ratio: Decimal::from(self.group) / count,
        }
    }
}

/// Raw metrics for every worker appearing in `projects`.
fn collect_metrics(projects: &[Project]) -> BTreeMap<i64, RawMetrics> {
    let mut acc: BTreeMap<i64, Accumulator> = BTreeMap::new();
    for project in projects {
        let allocations = compute_allocations(project);
        for member in &project.members {
            let entry = acc.entry(member.worker_id).or_default();
            entry.projects += 1;
            if let Some(share) = allocations.get(&member.id) {
                entry.income += *share;
            }
            if project.status == ProjectStatus::Finished {
                entry.finished += 1;
            }
            if project.work_type == WorkType::Group {
                entry.group += 1;
            }
            entry.amount_sum += project.amount_or_zero();
        }
    }
    acc.iter().map(|(id, a)| (*id, a.metrics())).collect()
}

/// `value / max * 100`, capped at 100; zero when the maximum is zero.
fn normalise(value: Decimal, max: Decimal) -> Decimal {
    if max.is_zero() {
        return Decimal::ZERO;
    }
    let score = value / max * Decimal::ONE_HUNDRED;
    round_currency(score.min(Decimal::ONE_HUNDRED))
}

/// Build the performance profile for one worker against the department's
/// full project set.
pub fn build_worker_profile(projects: &[Project], worker: &Worker) -> WorkerProfile {
    let all = collect_metrics(projects);
    let own = all.get(&worker.id).cloned().unwrap_or_default();

    let max_of = |f: fn(&RawMetrics) -> Decimal| {
        all.values().map(f).max().unwrap_or(Decimal::ZERO)
    };

    let scores = ProfileScores {
        project_count: normalise(own.project_count, max_of(|m| m.project_count)),
        income: normalise(own.income, max_of(|m| m.income)),
        finished_ratio: normalise(own.finished_ratio, max_of(|m| m.finished_ratio)),
        avg_amount: normalise(own.avg_amount, max_of(|m| m.avg_amount)),
        group_ratio: normalise(own.group_ratio, max_of(|m| m.group_ratio)),
        overall: Decimal::ZERO,
    };
    let overall = round_currency(
        (scores.project_count
            + scores.income
            + scores.finished_ratio
            + scores.avg_amount
            + scores.group_ratio)
            / Decimal::from(5u32),
    );

    WorkerProfile {
        worker_id: worker.id,
        name: worker.name.clone(),
        metrics: own,
        scores: ProfileScores { overall, ..scores },
    }
}
