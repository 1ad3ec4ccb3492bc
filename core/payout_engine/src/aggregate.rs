//! # Aggregation layer
//!
//! Rolls per-membership allocations up into the structures the dashboard
//! and report exports consume: income totals with safe percentages,
//! per-worker income and status breakdowns, a trailing 12-month series,
//! and top-5 rankings.
//!
//! Everything here is a total, read-only function over the project
//! snapshot it is given: empty inputs produce zeroed results, never
//! errors, and percentages collapse to zero instead of dividing by zero.
//! The reference date for the monthly window is passed in explicitly so
//! the layer stays a pure function.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::distribution::{compute_allocations, round_currency};
use crate::model::{CategorySelection, Project, ProjectStatus};

/// Number of buckets in the monthly series.
pub const MONTH_WINDOW: usize = 12;

/// Per-worker totals over the selected project set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub worker_id: i64,
    pub name: String,
    /// Distinct projects the worker holds a membership on.
    pub project_count: usize,
    /// Sum of the worker's computed allocations.
    pub income: Decimal,
    pub finished: usize,
    pub ongoing: usize,
    pub on_hold: usize,
    pub canceled: usize,
}

impl WorkerStats {
    fn new(worker_id: i64, name: String) -> Self {
        Self {
            worker_id,
            name,
            project_count: 0,
            income: Decimal::ZERO,
            finished: 0,
            ongoing: 0,
            on_hold: 0,
            canceled: 0,
        }
    }
}

/// One month of the trailing series. Idle months report zeros, not
/// absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM` label for chart axes and export columns.
    pub label: String,
    pub income: Decimal,
    pub project_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRank {
    pub project_id: i64,
    pub title: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerCountRank {
    pub worker_id: i64,
    pub name: String,
    pub project_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerIncomeRank {
    pub worker_id: i64,
    pub name: String,
    pub income: Decimal,
}

/// Everything the dashboard needs for one category (or the whole
/// department when the selection is `all`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub selection: CategorySelection,
    pub income_total: Decimal,
    pub project_count: usize,
    /// Selected income as a percentage of department-wide income;
    /// zero when the department total is zero.
    pub income_percentage: Decimal,
    /// Selected project count as a percentage of all projects.
    pub project_percentage: Decimal,
    pub workers: Vec<WorkerStats>,
    pub monthly: Vec<MonthBucket>,
    pub top_projects_by_amount: Vec<ProjectRank>,
    pub top_workers_by_project_count: Vec<WorkerCountRank>,
    pub top_workers_by_income: Vec<WorkerIncomeRank>,
}

/// `part / whole * 100`, collapsing to zero when `whole` is zero.
fn safe_percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        round_currency(part / whole * Decimal::ONE_HUNDRED)
    }
}

/// The last `MONTH_WINDOW` `(year, month)` pairs ending at `as_of`'s
/// month inclusive, oldest first.
fn month_window(as_of: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::with_capacity(MONTH_WINDOW);
    let (mut year, mut month) = (as_of.year(), as_of.month());
    for _ in 0..MONTH_WINDOW {
        months.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

/// Accumulate per-worker stats across `projects`, keyed by worker id.
///
/// Relies on the (project, worker) uniqueness invariant: each project
/// contributes at most one membership per worker, so distinct-project
/// counts can be incremented per membership.
fn collect_worker_stats(projects: &[&Project]) -> BTreeMap<i64, WorkerStats> {
    let mut stats: BTreeMap<i64, WorkerStats> = BTreeMap::new();
    for project in projects {
        let allocations = compute_allocations(project);
        for member in &project.members {
            let entry = stats
                .entry(member.worker_id)
                .or_insert_with(|| WorkerStats::new(member.worker_id, member.worker_name.clone()));
            entry.project_count += 1;
            if let Some(share) = allocations.get(&member.id) {
                entry.income += *share;
            }
            match project.status {
                ProjectStatus::Finished => entry.finished += 1,
                ProjectStatus::Ongoing => entry.ongoing += 1,
                ProjectStatus::OnHold => entry.on_hold += 1,
                ProjectStatus::Canceled => entry.canceled += 1,
                ProjectStatus::Started => {}
            }
        }
    }
    stats
}

fn monthly_series(projects: &[&Project], as_of: NaiveDate) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = month_window(as_of)
        .into_iter()
        .map(|(year, month)| MonthBucket {
            year,
            month,
            label: format!("{year:04}-{month:02}"),
            income: Decimal::ZERO,
            project_count: 0,
        })
        .collect();

    for project in projects {
        let key = (project.start_date.year(), project.start_date.month());
        if let Some(bucket) = buckets.iter_mut().find(|b| (b.year, b.month) == key) {
            bucket.income += project.amount_or_zero();
            bucket.project_count += 1;
        }
    }
    buckets
}

fn top_projects(projects: &[&Project], n: usize) -> Vec<ProjectRank> {
    let mut ranks: Vec<ProjectRank> = projects
        .iter()
        .map(|p| ProjectRank {
            project_id: p.id,
            title: p.title.clone(),
            amount: p.amount_or_zero(),
        })
        .collect();
    ranks.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.title.cmp(&b.title)));
    ranks.truncate(n);
    ranks
}

/// Build the aggregate view for one category selection.
///
/// `projects` is the department's full project set; percentages are
/// computed against it. The caller supplies `as_of` (normally today) as
/// the end of the 12-month window.
pub fn build_category_aggregate(
    projects: &[Project],
    selection: CategorySelection,
    as_of: NaiveDate,
) -> CategoryAggregate {
    let selected: Vec<&Project> = projects
        .iter()
        .filter(|p| selection.matches(p.category))
        .collect();

    let overall_income: Decimal = projects.iter().map(Project::amount_or_zero).sum();
    let income_total: Decimal = selected.iter().map(|p| p.amount_or_zero()).sum();

    let stats = collect_worker_stats(&selected);

    let mut by_count: Vec<WorkerCountRank> = stats
        .values()
        .map(|s| WorkerCountRank {
            worker_id: s.worker_id,
            name: s.name.clone(),
            project_count: s.project_count,
        })
        .collect();
    by_count.sort_by(|a, b| {
        b.project_count
            .cmp(&a.project_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    by_count.truncate(5);

    let mut by_income: Vec<WorkerIncomeRank> = stats
        .values()
        .map(|s| WorkerIncomeRank {
            worker_id: s.worker_id,
            name: s.name.clone(),
            income: s.income,
        })
        .collect();
    by_income.sort_by(|a, b| b.income.cmp(&a.income).then_with(|| a.worker_id.cmp(&b.worker_id)));
    by_income.truncate(5);

    CategoryAggregate {
        selection,
        income_total,
        project_count: selected.len(),
        income_percentage: safe_percentage(income_total, overall_income),
        project_percentage: safe_percentage(
            Decimal::from(selected.len() as u64),
            Decimal::from(projects.len() as u64),
        ),
        monthly: monthly_series(&selected, as_of),
        top_projects_by_amount: top_projects(&selected, 5),
        top_workers_by_project_count: by_count,
        top_workers_by_income: by_income,
        workers: stats.into_values().collect(),
    }
}
