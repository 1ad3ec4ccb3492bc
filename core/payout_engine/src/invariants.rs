#![allow(dead_code)]

//! Test-only assertion helpers for the numeric invariants of the
//! distribution engine.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::model::Project;

/// One cent, the rounding granularity of every allocation.
pub fn cent() -> Decimal {
    Decimal::new(1, 2)
}

/// INV-1: the allocations of a funded project sum to the project amount
/// within ± (membership count × 0.01) of rounding slack.
pub fn assert_allocations_sum_to_amount(project: &Project, allocations: &BTreeMap<i64, Decimal>) {
    let amount = project.amount.expect("project under test must have an amount");
    let sum: Decimal = allocations.values().copied().sum();
    let tolerance = cent() * Decimal::from(allocations.len() as u64);
    assert!(
        (sum - amount).abs() <= tolerance,
        "INV-1 violated: allocations sum {} differs from amount {} by more than {}",
        sum,
        amount,
        tolerance
    );
}

/// INV-2: every member of `ids` received the same share, ± one cent for
/// indivisible remainders.
pub fn assert_equal_shares(allocations: &BTreeMap<i64, Decimal>, ids: &[i64]) {
    let shares: Vec<Decimal> = ids
        .iter()
        .map(|id| *allocations.get(id).expect("missing allocation"))
        .collect();
    let (min, max) = (
        shares.iter().copied().min().unwrap(),
        shares.iter().copied().max().unwrap(),
    );
    assert!(
        max - min <= cent(),
        "INV-2 violated: shares not equal: min {} max {}",
        min,
        max
    );
}

/// INV-3: the members in `ids` jointly received `expected` of the pot,
/// within one cent per member.
pub fn assert_pot_total(
    allocations: &BTreeMap<i64, Decimal>,
    ids: &[i64],
    expected: Decimal,
) {
    let total: Decimal = ids
        .iter()
        .map(|id| *allocations.get(id).expect("missing allocation"))
        .sum();
    let tolerance = cent() * Decimal::from(ids.len() as u64);
    assert!(
        (total - expected).abs() <= tolerance,
        "INV-3 violated: pot total {} differs from expected {} by more than {}",
        total,
        expected,
        tolerance
    );
}

/// INV-4: under the weighted fallback, a member's share is proportional
/// to its tier weight: share_a / weight_a == share_b / weight_b.
pub fn assert_weight_proportional(
    allocations: &BTreeMap<i64, Decimal>,
    a: (i64, u32),
    b: (i64, u32),
) {
    let share_a = *allocations.get(&a.0).expect("missing allocation");
    let share_b = *allocations.get(&b.0).expect("missing allocation");
    let lhs = share_a * Decimal::from(b.1);
    let rhs = share_b * Decimal::from(a.1);
    // Cross-multiplied comparison; allow a cent of rounding per side.
    assert!(
        (lhs - rhs).abs() <= cent() * Decimal::from(a.1.max(b.1)),
        "INV-4 violated: shares {} (w{}) and {} (w{}) are not weight-proportional",
        share_a,
        a.1,
        share_b,
        b.1
    );
}
