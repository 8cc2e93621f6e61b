//! Balance accumulation.
//!
//! Folds a payment log into one signed balance per member. Positive means
//! the group owes the member money; negative means the member owes the group.
//! Every payment credits its payer and debits its participants by exactly the
//! same total, so the balances always sum to zero.

use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::member::Member;
use super::payment::Payment;
use crate::domain::foundation::{MemberId, Money};

/// Net position of every member of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceSheet {
    balances: BTreeMap<MemberId, Money>,
}

impl BalanceSheet {
    /// Sheet with a zero balance for each given member.
    pub fn with_members<'a>(members: impl IntoIterator<Item = &'a MemberId>) -> Self {
        Self {
            balances: members.into_iter().map(|id| (id.clone(), Money::ZERO)).collect(),
        }
    }

    /// Balance of one member, or `None` if they are not on the sheet.
    pub fn get(&self, member: &MemberId) -> Option<Money> {
        self.balances.get(member).copied()
    }

    /// Sum of all balances. Zero for any sheet built by the accumulator.
    pub fn sum(&self) -> Money {
        self.balances.values().sum()
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Iterates balances in member id order.
    pub fn iter(&self) -> btree_map::Iter<'_, MemberId, Money> {
        self.balances.iter()
    }

    /// True if every balance is within `tolerance` of zero.
    pub fn is_settled(&self, tolerance: Money) -> bool {
        self.balances.values().all(|b| b.is_within(tolerance))
    }

    pub(crate) fn adjust(&mut self, member: &MemberId, delta: Money) {
        if let Some(balance) = self.balances.get_mut(member) {
            *balance += delta;
        }
    }

    fn contains(&self, member: &MemberId) -> bool {
        self.balances.contains_key(member)
    }
}

impl<'a> IntoIterator for &'a BalanceSheet {
    type Item = (&'a MemberId, &'a Money);
    type IntoIter = btree_map::Iter<'a, MemberId, Money>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(MemberId, Money)> for BalanceSheet {
    fn from_iter<I: IntoIterator<Item = (MemberId, Money)>>(iter: I) -> Self {
        Self {
            balances: iter.into_iter().collect(),
        }
    }
}

/// Computes balances from a project's members and payments.
pub struct BalanceAccumulator;

impl BalanceAccumulator {
    /// Folds `payments` into a balance for each of `members`.
    ///
    /// Payments without explicit participants are split across the members
    /// that had joined by the time the payment was recorded, in the given
    /// order. Members added later take no share. Participants that are not members are skipped with a
    /// warning. A payment whose payer is unknown, or which has no known
    /// participant left, is skipped entirely so the sheet stays zero-sum.
    pub fn compute_balances(members: &[Member], payments: &[Payment]) -> BalanceSheet {
        let mut sheet = BalanceSheet::with_members(members.iter().map(|m| &m.id));

        for payment in payments {
            if !sheet.contains(&payment.payer_member_id) {
                tracing::warn!(
                    payment_id = %payment.id,
                    payer = %payment.payer_member_id,
                    "Payer is not a project member, skipping payment"
                );
                continue;
            }

            let group = Self::split_group(&sheet, members, payment);
            if group.is_empty() {
                tracing::warn!(
                    payment_id = %payment.id,
                    "Payment has no known participants, skipping payment"
                );
                continue;
            }

            sheet.adjust(&payment.payer_member_id, payment.amount);
            for (member, share) in group.iter().zip(payment.amount.split_evenly(group.len())) {
                sheet.adjust(member, -share);
            }
        }

        tracing::debug!(
            members = sheet.len(),
            payments = payments.len(),
            "Computed balances"
        );
        sheet
    }

    fn split_group(sheet: &BalanceSheet, members: &[Member], payment: &Payment) -> Vec<MemberId> {
        let explicit = match &payment.participants {
            Some(list) if !list.is_empty() => list,
            _ => {
                return members
                    .iter()
                    .filter(|m| m.added_at <= payment.created_at)
                    .map(|m| m.id.clone())
                    .collect()
            }
        };

        let mut seen = HashSet::new();
        let mut group = Vec::with_capacity(explicit.len());
        for participant in explicit {
            if !sheet.contains(participant) {
                tracing::warn!(
                    payment_id = %payment.id,
                    participant = %participant,
                    "Participant is not a project member, excluding from split"
                );
                continue;
            }
            if seen.insert(participant) {
                group.push(participant.clone());
            }
        }
        group
    }
}
