use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::{Membership, Project, ProjectCategory, ProjectStatus, WorkType, Worker};
use crate::profile::build_worker_profile;
use crate::tiers::ContributionTier;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn worker(id: i64, name: &str) -> Worker {
    Worker {
        id,
        department_id: 1,
        name: name.to_string(),
    }
}

/// Two projects, two workers.
///
/// p1 (group, finished, 1000): W1 gold / W2 silver -> 600 / 400.
/// p2 (solo, ongoing, 500): W1 gold -> 500.
fn department() -> Vec<Project> {
    vec![
        Project {
            id: 1,
            title: "Billing revamp".to_string(),
            category: ProjectCategory::Client,
            work_type: WorkType::Group,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            status: ProjectStatus::Finished,
            amount: Some(d("1000.00")),
            members: vec![
                Membership {
                    id: 1,
                    project_id: 1,
                    worker_id: 101,
                    worker_name: "Asha".to_string(),
                    tier: ContributionTier::Gold,
                },
                Membership {
                    id: 2,
                    project_id: 1,
                    worker_id: 102,
                    worker_name: "Bran".to_string(),
                    tier: ContributionTier::Silver,
                },
            ],
        },
        Project {
            id: 2,
            title: "Site audit".to_string(),
            category: ProjectCategory::Client,
            work_type: WorkType::Solo,
            start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            status: ProjectStatus::Ongoing,
            amount: Some(d("500.00")),
            members: vec![Membership {
                id: 3,
                project_id: 2,
                worker_id: 101,
                worker_name: "Asha".to_string(),
                tier: ContributionTier::Gold,
            }],
        },
    ]
}

#[test]
fn raw_metrics_follow_engine_allocations() {
    let profile = build_worker_profile(&department(), &worker(101, "Asha"));

    assert_eq!(profile.metrics.project_count, d("2"));
    assert_eq!(profile.metrics.income, d("1100.00"));
    assert_eq!(profile.metrics.finished_ratio, d("0.5"));
    assert_eq!(profile.metrics.avg_amount, d("750.00"));
    assert_eq!(profile.metrics.group_ratio, d("0.5"));
}

#[test]
fn scores_normalise_against_department_maxima() {
    let profile = build_worker_profile(&department(), &worker(101, "Asha"));

    // Asha holds the maxima for project count and income.
    assert_eq!(profile.scores.project_count, d("100.00"));
    assert_eq!(profile.scores.income, d("100.00"));
    // Bran's ratios (1.0) and avg amount (1000) are the maxima.
    assert_eq!(profile.scores.finished_ratio, d("50.00"));
    assert_eq!(profile.scores.avg_amount, d("75.00"));
    assert_eq!(profile.scores.group_ratio, d("50.00"));
    assert_eq!(profile.scores.overall, d("75.00"));
}

#[test]
fn second_worker_scores_round_to_two_places() {
    let profile = build_worker_profile(&department(), &worker(102, "Bran"));

    assert_eq!(profile.scores.project_count, d("50.00"));
    // 400 / 1100 * 100
    assert_eq!(profile.scores.income, d("36.36"));
    assert_eq!(profile.scores.finished_ratio, d("100.00"));
    assert_eq!(profile.scores.avg_amount, d("100.00"));
    assert_eq!(profile.scores.group_ratio, d("100.00"));
    assert_eq!(profile.scores.overall, d("77.27"));
}

#[test]
fn worker_without_memberships_scores_zero_everywhere() {
    let profile = build_worker_profile(&department(), &worker(999, "Newcomer"));

    assert_eq!(profile.metrics.project_count, Decimal::ZERO);
    assert_eq!(profile.metrics.income, Decimal::ZERO);
    assert_eq!(profile.scores.overall, Decimal::ZERO);
    assert_eq!(profile.name, "Newcomer");
}

#[test]
fn empty_department_profiles_to_zero() {
    let profile = build_worker_profile(&[], &worker(101, "Asha"));
    assert_eq!(profile.scores.overall, Decimal::ZERO);
}
