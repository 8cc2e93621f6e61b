//! Settlement report with member display data.

use std::collections::HashMap;

use serde::Serialize;

use super::balance::BalanceAccumulator;
use super::member::Member;
use super::payment::Payment;
use super::project::Project;
use super::settlement::{SettlementSolver, SettlementState};
use crate::domain::foundation::{MemberId, Money, ProjectId};

/// A transfer with the names of both parties resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementLine {
    pub from: MemberId,
    pub from_name: String,
    pub to: MemberId,
    pub to_name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub display_name: String,
    pub balance: Money,
}

/// Everything a client needs to show "who pays whom".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    pub project_id: ProjectId,
    pub total_amount: Money,
    pub state: SettlementState,
    /// Balances in member join order.
    pub balances: Vec<MemberBalance>,
    pub transfers: Vec<SettlementLine>,
}

impl SettlementReport {
    /// Runs the accumulator and solver over one consistent ledger snapshot.
    pub fn build(project: &Project, members: &[Member], payments: &[Payment], tolerance: Money) -> Self {
        let sheet = BalanceAccumulator::compute_balances(members, payments);
        let transfers = SettlementSolver::solve(&sheet, tolerance);

        let names: HashMap<&MemberId, &str> = members
            .iter()
            .map(|m| (&m.id, m.display_name.as_str()))
            .collect();
        let name_of = |id: &MemberId| {
            names
                .get(id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| id.to_string())
        };

        let balances = members
            .iter()
            .map(|m| MemberBalance {
                member_id: m.id.clone(),
                display_name: m.display_name.clone(),
                balance: sheet.get(&m.id).unwrap_or(Money::ZERO),
            })
            .collect();

        let state = SettlementState::of(&transfers);
        let transfers = transfers
            .into_iter()
            .map(|t| SettlementLine {
                from_name: name_of(&t.from),
                to_name: name_of(&t.to),
                from: t.from,
                to: t.to,
                amount: t.amount,
            })
            .collect();

        Self {
            project_id: project.id,
            total_amount: project.total_amount,
            state,
            balances,
            transfers,
        }
    }
}
