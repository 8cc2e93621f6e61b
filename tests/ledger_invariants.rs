//! Property tests for ledger invariants.
//!
//! Random ledgers of up to six members and twenty payments, checked against
//! the balance accumulator, the settlement solver, and the in-memory store.

use proptest::prelude::*;

use warikan_ledger::adapters::InMemoryLedgerStore;
use warikan_ledger::domain::foundation::{MemberId, Money, ProjectId, UserId};
use warikan_ledger::domain::ledger::{
    apply_transfers, BalanceAccumulator, BalanceSheet, Member, NewMember, NewPayment, Payment,
    SettlementSolver,
};
use warikan_ledger::ports::LedgerStore;

/// (payer index, amount, participant indices)
type PaymentSpec = (usize, i64, Option<Vec<usize>>);

fn ledger_strategy() -> impl Strategy<Value = (usize, Vec<PaymentSpec>)> {
    (1usize..=6).prop_flat_map(|members| {
        let indices: Vec<usize> = (0..members).collect();
        let payment = (
            0..members,
            1i64..=100_000,
            proptest::option::of(proptest::sample::subsequence(indices, 1..=members)),
        );
        (Just(members), proptest::collection::vec(payment, 0..20))
    })
}

fn build_ledger(member_count: usize, specs: &[PaymentSpec]) -> (Vec<Member>, Vec<Payment>) {
    let project_id = ProjectId::new();
    let members: Vec<Member> = (0..member_count)
        .map(|i| {
            NewMember::guest(format!("Member {}", i))
                .unwrap()
                .into_member(project_id)
        })
        .collect();
    let payments = specs
        .iter()
        .map(|(payer, amount, participants)| {
            NewPayment::new(
                members[*payer].id.clone(),
                Money::from_minor(*amount),
                None,
                participants
                    .as_ref()
                    .map(|idx| idx.iter().map(|i| members[*i].id.clone()).collect()),
            )
            .unwrap()
            .into_payment(project_id)
        })
        .collect();
    (members, payments)
}

async fn balances(store: &InMemoryLedgerStore, project_id: &ProjectId) -> BalanceSheet {
    let members = store.list_members(project_id).await.unwrap();
    let payments = store.list_payments(project_id).await.unwrap();
    BalanceAccumulator::compute_balances(&members, &payments)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn balances_always_sum_to_zero((count, specs) in ledger_strategy()) {
        let (members, payments) = build_ledger(count, &specs);

        let sheet = BalanceAccumulator::compute_balances(&members, &payments);

        prop_assert_eq!(sheet.sum(), Money::ZERO);
        prop_assert_eq!(sheet.len(), members.len());
    }

    #[test]
    fn transfers_close_every_balance((count, specs) in ledger_strategy()) {
        let (members, payments) = build_ledger(count, &specs);
        let sheet = BalanceAccumulator::compute_balances(&members, &payments);

        let transfers = SettlementSolver::solve_exact(&sheet);
        let after = apply_transfers(&sheet, &transfers);

        prop_assert!(after.is_settled(Money::ZERO));
        for transfer in &transfers {
            prop_assert!(transfer.amount.is_positive());
            prop_assert_ne!(&transfer.from, &transfer.to);
        }

        let open = sheet.iter().filter(|(_, b)| **b != Money::ZERO).count();
        prop_assert!(transfers.len() <= open.saturating_sub(1));
    }

    #[test]
    fn solver_is_deterministic((count, specs) in ledger_strategy()) {
        let (members, payments) = build_ledger(count, &specs);
        let sheet = BalanceAccumulator::compute_balances(&members, &payments);

        prop_assert_eq!(
            SettlementSolver::solve_exact(&sheet),
            SettlementSolver::solve_exact(&sheet)
        );
    }

    #[test]
    fn deleting_payments_restores_total_and_balances((count, specs) in ledger_strategy()) {
        runtime().block_on(async {
            let store = InMemoryLedgerStore::new();
            let owner = NewMember::linked(UserId::new("U-owner").unwrap(), "Owner").unwrap();
            let project = store.create_project(&owner, "Property trip").await.unwrap();

            let mut ids: Vec<MemberId> = vec![owner.id.clone()];
            for i in 1..count {
                let guest = store
                    .add_member(&project.id, NewMember::guest(format!("Guest {}", i)).unwrap())
                    .await
                    .unwrap();
                ids.push(guest.id);
            }

            let before = balances(&store, &project.id).await;

            let mut recorded = Vec::new();
            for (payer, amount, participants) in &specs {
                let payment = NewPayment::new(
                    ids[*payer].clone(),
                    Money::from_minor(*amount),
                    None,
                    participants
                        .as_ref()
                        .map(|idx| idx.iter().map(|i| ids[*i].clone()).collect()),
                )
                .unwrap();
                recorded.push(store.add_payment(&project.id, payment).await.unwrap());
            }

            let expected: Money = recorded.iter().map(|p| p.amount).sum();
            let current = store.get_project(&project.id).await.unwrap().unwrap();
            assert_eq!(current.total_amount, expected);

            for payment in &recorded {
                store.delete_payment(&project.id, &payment.id).await.unwrap();
            }

            let current = store.get_project(&project.id).await.unwrap().unwrap();
            assert_eq!(current.total_amount, Money::ZERO);
            assert!(store.list_payments(&project.id).await.unwrap().is_empty());
            assert_eq!(balances(&store, &project.id).await, before);
        });
    }
}
