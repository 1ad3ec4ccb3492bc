use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::distribution::compute_allocations;
use crate::invariants;
use crate::model::{Membership, Project, ProjectCategory, ProjectStatus, WorkType};
use crate::tiers::ContributionTier;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn member(id: i64, tier: ContributionTier) -> Membership {
    Membership {
        id,
        project_id: 1,
        worker_id: id * 10,
        worker_name: format!("Worker {id}"),
        tier,
    }
}

fn project(amount: Option<&str>, members: Vec<Membership>) -> Project {
    Project {
        id: 1,
        title: "Billing revamp".to_string(),
        category: ProjectCategory::Client,
        work_type: WorkType::Group,
        start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        status: ProjectStatus::Ongoing,
        amount: amount.map(|a| d(a)),
        members,
    }
}

#[test]
fn gold_only_splits_equally() {
    // Worked example: 500.00 across two gold members.
    let p = project(
        Some("500.00"),
        vec![
            member(1, ContributionTier::Gold),
            member(2, ContributionTier::Gold),
        ],
    );
    let allocations = compute_allocations(&p);

    assert_eq!(allocations[&1], d("250.00"));
    assert_eq!(allocations[&2], d("250.00"));
    invariants::assert_allocations_sum_to_amount(&p, &allocations);
    invariants::assert_equal_shares(&allocations, &[1, 2]);
}

#[test]
fn gold_only_indivisible_remainder_stays_within_a_cent() {
    let p = project(
        Some("100.00"),
        vec![
            member(1, ContributionTier::Gold),
            member(2, ContributionTier::Gold),
            member(3, ContributionTier::Gold),
        ],
    );
    let allocations = compute_allocations(&p);

    assert_eq!(allocations[&1], d("33.33"));
    invariants::assert_equal_shares(&allocations, &[1, 2, 3]);
    invariants::assert_allocations_sum_to_amount(&p, &allocations);
}

#[test]
fn gold_silver_splits_sixty_forty() {
    // Worked example: 1000.00, [gold, gold, silver] -> 300/300/400.
    let p = project(
        Some("1000.00"),
        vec![
            member(1, ContributionTier::Gold),
            member(2, ContributionTier::Gold),
            member(3, ContributionTier::Silver),
        ],
    );
    let allocations = compute_allocations(&p);

    assert_eq!(allocations[&1], d("300.00"));
    assert_eq!(allocations[&2], d("300.00"));
    assert_eq!(allocations[&3], d("400.00"));
    invariants::assert_pot_total(&allocations, &[1, 2], d("600.00"));
    invariants::assert_pot_total(&allocations, &[3], d("400.00"));
    invariants::assert_allocations_sum_to_amount(&p, &allocations);
}

#[test]
fn gold_copper_splits_seventy_thirty() {
    let p = project(
        Some("1000.00"),
        vec![
            member(1, ContributionTier::Gold),
            member(2, ContributionTier::Copper),
            member(3, ContributionTier::Copper),
        ],
    );
    let allocations = compute_allocations(&p);

    assert_eq!(allocations[&1], d("700.00"));
    assert_eq!(allocations[&2], d("150.00"));
    assert_eq!(allocations[&3], d("150.00"));
    invariants::assert_pot_total(&allocations, &[1], d("700.00"));
    invariants::assert_pot_total(&allocations, &[2, 3], d("300.00"));
}

#[test]
fn all_three_tiers_use_weighted_fallback() {
    // Worked example: 900.00, weights 3/2/1 over total 6 -> 450/300/150.
    let p = project(
        Some("900.00"),
        vec![
            member(1, ContributionTier::Gold),
            member(2, ContributionTier::Silver),
            member(3, ContributionTier::Copper),
        ],
    );
    let allocations = compute_allocations(&p);

    assert_eq!(allocations[&1], d("450.00"));
    assert_eq!(allocations[&2], d("300.00"));
    assert_eq!(allocations[&3], d("150.00"));
    // A weight-3 member earns exactly 1.5x a weight-2 member here.
    assert_eq!(allocations[&1], allocations[&2] * d("1.5"));
    invariants::assert_weight_proportional(&allocations, (1, 3), (2, 2));
    invariants::assert_weight_proportional(&allocations, (2, 2), (3, 1));
    invariants::assert_allocations_sum_to_amount(&p, &allocations);
}

#[test]
fn fallback_silver_copper_without_gold() {
    // No dedicated percentage rule exists for silver+copper: it falls
    // through to the weighted split, weights 2/1 over total 3.
    let p = project(
        Some("600.00"),
        vec![
            member(1, ContributionTier::Silver),
            member(2, ContributionTier::Copper),
        ],
    );
    let allocations = compute_allocations(&p);

    assert_eq!(allocations[&1], d("400.00"));
    assert_eq!(allocations[&2], d("200.00"));
    invariants::assert_weight_proportional(&allocations, (1, 2), (2, 1));
    invariants::assert_allocations_sum_to_amount(&p, &allocations);
}

#[test]
fn midpoint_shares_round_half_up() {
    // 66.67 over two gold members: 33.335 each rounds to 33.34.
    let p = project(
        Some("66.67"),
        vec![
            member(1, ContributionTier::Gold),
            member(2, ContributionTier::Gold),
        ],
    );
    let allocations = compute_allocations(&p);

    assert_eq!(allocations[&1], d("33.34"));
    assert_eq!(allocations[&2], d("33.34"));
    invariants::assert_allocations_sum_to_amount(&p, &allocations);
}

#[test]
fn missing_amount_yields_empty_map() {
    let p = project(None, vec![member(1, ContributionTier::Gold)]);
    assert!(compute_allocations(&p).is_empty());
}

#[test]
fn zero_amount_yields_empty_map() {
    let p = project(Some("0.00"), vec![member(1, ContributionTier::Gold)]);
    assert!(compute_allocations(&p).is_empty());
}

#[test]
fn no_members_yields_empty_map() {
    let p = project(Some("1000.00"), vec![]);
    assert!(compute_allocations(&p).is_empty());
}

#[test]
fn single_silver_member_gets_full_amount_via_fallback() {
    let p = project(Some("750.00"), vec![member(1, ContributionTier::Silver)]);
    let allocations = compute_allocations(&p);
    assert_eq!(allocations[&1], d("750.00"));
}

#[test]
fn recomputation_is_deterministic() {
    let p = project(
        Some("1234.56"),
        vec![
            member(1, ContributionTier::Gold),
            member(2, ContributionTier::Silver),
            member(3, ContributionTier::Copper),
        ],
    );
    assert_eq!(compute_allocations(&p), compute_allocations(&p));
}
