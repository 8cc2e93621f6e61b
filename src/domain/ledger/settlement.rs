//! Settlement solver.
//!
//! Turns a balance sheet into a list of pairwise transfers that bring every
//! balance back to zero. The matcher is greedy: largest debtor pays largest
//! creditor until one side is exhausted. It is not guaranteed to produce the
//! minimum number of transfers, but it never produces more than
//! `creditors + debtors - 1`, and for a given sheet it always produces the
//! same list.

use serde::{Deserialize, Serialize};

use super::balance::BalanceSheet;
use crate::domain::foundation::{MemberId, Money};

/// One payment instruction: `from` pays `to` the given amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
}

/// Whether a sheet needs any transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementState {
    NothingToSettle,
    TransfersRequired,
}

impl SettlementState {
    pub fn of(transfers: &[Transfer]) -> Self {
        if transfers.is_empty() {
            SettlementState::NothingToSettle
        } else {
            SettlementState::TransfersRequired
        }
    }
}

pub struct SettlementSolver;

impl SettlementSolver {
    /// Computes transfers that settle `sheet`.
    ///
    /// Balances within `tolerance` of zero are treated as settled.
    pub fn solve(sheet: &BalanceSheet, tolerance: Money) -> Vec<Transfer> {
        let tolerance = tolerance.abs();

        let mut creditors: Vec<(MemberId, Money)> = sheet
            .iter()
            .filter(|(_, b)| **b > tolerance)
            .map(|(id, b)| (id.clone(), *b))
            .collect();
        let mut debtors: Vec<(MemberId, Money)> = sheet
            .iter()
            .filter(|(_, b)| **b < -tolerance)
            .map(|(id, b)| (id.clone(), b.abs()))
            .collect();

        // Largest first; equal amounts fall back to member id so output is stable.
        creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        debtors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut transfers = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let amount = debtors[i].1.min(creditors[j].1);
            if amount > tolerance {
                transfers.push(Transfer {
                    from: debtors[i].0.clone(),
                    to: creditors[j].0.clone(),
                    amount,
                });
            }
            debtors[i].1 -= amount;
            creditors[j].1 -= amount;

            if debtors[i].1 <= tolerance {
                i += 1;
            }
            if creditors[j].1 <= tolerance {
                j += 1;
            }
        }

        tracing::debug!(
            creditors = creditors.len(),
            debtors = debtors.len(),
            transfers = transfers.len(),
            "Solved settlement"
        );
        transfers
    }

    /// `solve` with zero tolerance.
    pub fn solve_exact(sheet: &BalanceSheet) -> Vec<Transfer> {
        Self::solve(sheet, Money::ZERO)
    }
}

/// Returns the sheet that results from carrying out `transfers`.
pub fn apply_transfers(sheet: &BalanceSheet, transfers: &[Transfer]) -> BalanceSheet {
    let mut result = sheet.clone();
    for transfer in transfers {
        result.adjust(&transfer.from, transfer.amount);
        result.adjust(&transfer.to, -transfer.amount);
    }
    result
}
