//! # Distribution rule engine
//!
//! Computes each membership's share of a project's amount from the
//! composition of contribution tiers present. The rules, checked in
//! priority order with the first match winning:
//!
//! | Tiers present          | Split                                        |
//! |------------------------|----------------------------------------------|
//! | gold only              | equal split of the full amount               |
//! | gold + silver          | 60% pot to gold, 40% pot to silver           |
//! | gold + copper          | 70% pot to gold, 30% pot to copper           |
//! | any other combination  | weighted by {gold 3, silver 2, copper 1}     |
//!
//! Each pot is split equally within its tier. Silver+copper without gold
//! has no named rule and deliberately falls through to the weighted
//! fallback.
//!
//! This is a pure function of `(amount, membership tiers)`: no
//! persistence, no caching, safe to call from concurrent readers.
//! Allocations are recomputed on every call so they always reflect the
//! live membership set.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::model::Project;
use crate::tiers::ContributionTier;

/// Tier composition of a membership set, in rule priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TierMix {
    GoldOnly,
    GoldSilver,
    GoldCopper,
    Weighted,
}

impl TierMix {
    fn of(gold: &[i64], silver: &[i64], copper: &[i64]) -> Self {
        match (!gold.is_empty(), !silver.is_empty(), !copper.is_empty()) {
            (true, false, false) => Self::GoldOnly,
            (true, true, false) => Self::GoldSilver,
            (true, false, true) => Self::GoldCopper,
            _ => Self::Weighted,
        }
    }
}

/// Round a monetary value to 2 decimal places, half away from zero.
pub(crate) fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Split `pot` equally among `ids`, rounding each share.
fn split_equally(pot: Decimal, ids: &[i64], out: &mut BTreeMap<i64, Decimal>) {
    let count = Decimal::from(ids.len() as u64);
    for &id in ids {
        out.insert(id, round_currency(pot / count));
    }
}

/// Compute the payment allocation for one project.
///
/// Returns a map from membership id to the allocated amount. Projects
/// with no amount, a zero amount, or no memberships yield an empty map —
/// never an error. Unknown tiers cannot reach this function: the
/// [`ContributionTier`] enum is closed and parsing rejects corrupt data
/// at the store boundary.
pub fn compute_allocations(project: &Project) -> BTreeMap<i64, Decimal> {
    let mut allocations = BTreeMap::new();

    let amount = match project.amount {
        Some(a) if !a.is_zero() => a,
        _ => return allocations,
    };
    if project.members.is_empty() {
        return allocations;
    }

    let mut gold = Vec::new();
    let mut silver = Vec::new();
    let mut copper = Vec::new();
    for member in &project.members {
        match member.tier {
            ContributionTier::Gold => gold.push(member.id),
            ContributionTier::Silver => silver.push(member.id),
            ContributionTier::Copper => copper.push(member.id),
        }
    }

    let mix = TierMix::of(&gold, &silver, &copper);
    debug!(project_id = project.id, ?mix, %amount, "distributing project payment");

    match mix {
        TierMix::GoldOnly => {
            split_equally(amount, &gold, &mut allocations);
        }
        TierMix::GoldSilver => {
            split_equally(amount * Decimal::new(60, 2), &gold, &mut allocations);
            split_equally(amount * Decimal::new(40, 2), &silver, &mut allocations);
        }
        TierMix::GoldCopper => {
            split_equally(amount * Decimal::new(70, 2), &gold, &mut allocations);
            split_equally(amount * Decimal::new(30, 2), &copper, &mut allocations);
        }
        TierMix::Weighted => {
            let total_weight: u32 = project
                .members
                .iter()
                .map(|m| m.tier.weight())
                .sum();
            // Weights are strictly positive constants, so a zero total
            // cannot occur while members exist. Guard anyway: a silent
            // division by zero here would be a financial-correctness bug.
            if total_weight == 0 {
                return allocations;
            }
            let total = Decimal::from(total_weight);
            for member in &project.members {
                let share = amount * Decimal::from(member.tier.weight()) / total;
                allocations.insert(member.id, round_currency(share));
            }
        }
    }

    allocations
}
