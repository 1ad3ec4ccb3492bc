//! # Report row builder
//!
//! Shapes engine and aggregation output into flat, serialisable rows.
//! The CSV/Excel/PDF writers live outside this crate; they only consume
//! these rows and apply their own styling.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::distribution::compute_allocations;
use crate::model::{Project, ProjectCategory, ProjectStatus};
use crate::tiers::ContributionTier;

/// Optional filters applied to the project listing. Built from raw query
/// parameters; values that fail to parse are dropped silently, matching
/// the dashboard's forgiving filter behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Case-insensitive substring match on the project title.
    pub query: Option<String>,
    /// Restrict to one `(year, month)`.
    pub month: Option<(i32, u32)>,
    /// Restrict to one year.
    pub year: Option<i32>,
    pub status: Option<ProjectStatus>,
}

impl ListingFilter {
    /// Parse raw query-parameter strings. `month` is `YYYY-MM`.
    pub fn from_params(
        query: Option<&str>,
        month: Option<&str>,
        year: Option<&str>,
        status: Option<&str>,
    ) -> Self {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let month = month.and_then(|m| {
            let (y, m) = m.trim().split_once('-')?;
            Some((y.parse().ok()?, m.parse().ok()?))
        });
        let year = year.and_then(|y| y.trim().parse().ok());
        let status = status.and_then(|s| s.trim().parse().ok());
        Self {
            query,
            month,
            year,
            status,
        }
    }

    pub fn matches(&self, project: &Project) -> bool {
        use chrono::Datelike;

        if let Some(q) = &self.query {
            if !project.title.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        if let Some((y, m)) = self.month {
            if project.start_date.year() != y || project.start_date.month() != m {
                return false;
            }
        }
        if let Some(y) = self.year {
            if project.start_date.year() != y {
                return false;
            }
        }
        if let Some(s) = self.status {
            if project.status != s {
                return false;
            }
        }
        true
    }
}

/// One row of the project listing export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    pub project_name: String,
    pub project_category: String,
    pub start_date: NaiveDate,
    pub status: String,
    /// Zero when the project carries no amount.
    pub amount: Decimal,
    pub assigned_workers: String,
}

fn joined_worker_names(project: &Project) -> String {
    if project.members.is_empty() {
        return "No workers assigned".to_string();
    }
    project
        .members
        .iter()
        .map(|m| m.worker_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sort a project subset the way every report presents it: newest start
/// date first, ties broken by id descending.
fn report_order<'a>(projects: impl Iterator<Item = &'a Project>) -> Vec<&'a Project> {
    let mut ordered: Vec<&Project> = projects.collect();
    ordered.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.id.cmp(&a.id))
    });
    ordered
}

/// Build filtered listing rows over `projects`.
pub fn listing_rows(projects: &[Project], filter: &ListingFilter) -> Vec<ListingRow> {
    report_order(projects.iter().filter(|p| filter.matches(p)))
        .into_iter()
        .map(|project| ListingRow {
            project_name: project.title.clone(),
            project_category: project.category.label().to_string(),
            start_date: project.start_date,
            status: project.status.label().to_string(),
            amount: project.amount_or_zero(),
            assigned_workers: joined_worker_names(project),
        })
        .collect()
}

/// One project row inside a [`CategoryReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReportRow {
    pub project_name: String,
    pub start_date: NaiveDate,
    pub status: String,
    pub worker_names: String,
}

/// Header plus rows for one category's export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub department_name: String,
    pub category_key: String,
    pub category_label: String,
    pub overall_income: Decimal,
    pub overall_project_count: usize,
    pub generated_at: String,
    pub projects: Vec<CategoryReportRow>,
}

/// Build the category report header and rows. `projects` is the
/// department's project set; only the given category is included.
pub fn build_category_report(
    department_name: &str,
    category: ProjectCategory,
    projects: &[Project],
    generated_at: NaiveDateTime,
) -> CategoryReport {
    let selected = report_order(projects.iter().filter(|p| p.category == category));
    let overall_income: Decimal = selected.iter().map(|p| p.amount_or_zero()).sum();

    CategoryReport {
        department_name: department_name.to_string(),
        category_key: category.as_str().to_string(),
        category_label: category.label().to_string(),
        overall_income,
        overall_project_count: selected.len(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        projects: selected
            .into_iter()
            .map(|project| CategoryReportRow {
                project_name: project.title.clone(),
                start_date: project.start_date,
                status: project.status.label().to_string(),
                worker_names: joined_worker_names(project),
            })
            .collect(),
    }
}

/// One computed payment split, ready for payout export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRow {
    pub membership_id: i64,
    pub project_id: i64,
    pub project_title: String,
    pub worker_id: i64,
    pub worker_name: String,
    pub tier: ContributionTier,
    pub amount: Decimal,
}

/// Flatten a project's live allocation map into export rows, one per
/// membership, in membership-id order.
pub fn allocation_rows(project: &Project) -> Vec<AllocationRow> {
    let allocations: BTreeMap<i64, Decimal> = compute_allocations(project);
    let mut rows: Vec<AllocationRow> = project
        .members
        .iter()
        .filter_map(|member| {
            allocations.get(&member.id).map(|amount| AllocationRow {
                membership_id: member.id,
                project_id: project.id,
                project_title: project.title.clone(),
                worker_id: member.worker_id,
                worker_name: member.worker_name.clone(),
                tier: member.tier,
                amount: *amount,
            })
        })
        .collect();
    rows.sort_by_key(|r| r.membership_id);
    rows
}
