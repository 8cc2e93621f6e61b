//! GetSettlementsHandler - Query handler computing who pays whom.
//!
//! Read-only: nothing computed here is persisted.

use std::sync::Arc;

use crate::domain::foundation::{Money, ProjectId, UserId};
use crate::domain::ledger::{LedgerError, SettlementReport};
use crate::ports::LedgerStore;

use super::access::require_member_in;

#[derive(Debug, Clone)]
pub struct GetSettlementsQuery {
    pub project_id: ProjectId,
    pub user_id: UserId,
}

pub struct GetSettlementsHandler {
    store: Arc<dyn LedgerStore>,
    tolerance: Money,
}

impl GetSettlementsHandler {
    pub fn new(store: Arc<dyn LedgerStore>, tolerance: Money) -> Self {
        Self { store, tolerance }
    }

    pub async fn handle(&self, query: GetSettlementsQuery) -> Result<SettlementReport, LedgerError> {
        let snapshot = self
            .store
            .load_snapshot(&query.project_id)
            .await?
            .ok_or_else(|| LedgerError::project_not_found(&query.project_id))?;
        require_member_in(&snapshot.project, &snapshot.members, &query.user_id)?;

        let report = SettlementReport::build(
            &snapshot.project,
            &snapshot.members,
            &snapshot.payments,
            self.tolerance,
        );

        tracing::debug!(
            project_id = %query.project_id,
            payments = snapshot.payments.len(),
            transfers = report.transfers.len(),
            "Settlement computed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ledger::test_support::{
        member_id, project_with_members, user, BOB, CAROL, OWNER, STRANGER,
    };
    use crate::domain::ledger::{
        apply_transfers, BalanceAccumulator, NewMember, SettlementState, Transfer,
    };

    fn query(project_id: ProjectId, caller: &str) -> GetSettlementsQuery {
        GetSettlementsQuery {
            project_id,
            user_id: user(caller),
        }
    }

    #[tokio::test]
    async fn even_split_over_all_members() {
        let fx = project_with_members().await;
        fx.payment(OWNER, 3000, None).await;
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let report = handler.handle(query(fx.project_id(), BOB)).await.unwrap();

        let balances: Vec<i64> = report.balances.iter().map(|b| b.balance.minor_units()).collect();
        assert_eq!(balances, vec![2000, -1000, -1000]);

        let transfers: Vec<(String, String, i64)> = report
            .transfers
            .iter()
            .map(|t| (t.from.to_string(), t.to.to_string(), t.amount.minor_units()))
            .collect();
        assert_eq!(
            transfers,
            vec![
                (BOB.to_string(), OWNER.to_string(), 1000),
                (CAROL.to_string(), OWNER.to_string(), 1000),
            ]
        );
        assert_eq!(report.transfers[0].to_name, "Alice");
    }

    #[tokio::test]
    async fn member_added_later_is_not_charged_for_earlier_payments() {
        let fx = project_with_members().await;
        fx.payment(OWNER, 3000, None).await;
        let dave = fx
            .store
            .add_member(&fx.project_id(), NewMember::guest("Dave").unwrap())
            .await
            .unwrap();
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let report = handler.handle(query(fx.project_id(), OWNER)).await.unwrap();

        let balances: Vec<i64> = report.balances.iter().map(|b| b.balance.minor_units()).collect();
        assert_eq!(balances, vec![2000, -1000, -1000, 0]);
        assert!(report.transfers.iter().all(|t| t.from != dave.id));
    }

    #[tokio::test]
    async fn explicit_participants_exclude_payer() {
        let fx = project_with_members().await;
        fx.payment(OWNER, 900, Some(&[BOB, CAROL])).await;
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let report = handler.handle(query(fx.project_id(), OWNER)).await.unwrap();

        let balances: Vec<i64> = report.balances.iter().map(|b| b.balance.minor_units()).collect();
        assert_eq!(balances, vec![900, -450, -450]);
    }

    #[tokio::test]
    async fn empty_ledger_has_nothing_to_settle() {
        let fx = project_with_members().await;
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let report = handler.handle(query(fx.project_id(), OWNER)).await.unwrap();

        assert!(report.transfers.is_empty());
        assert_eq!(report.state, SettlementState::NothingToSettle);
        assert_eq!(report.total_amount, Money::ZERO);
    }

    #[tokio::test]
    async fn following_the_transfers_settles_everyone() {
        let fx = project_with_members().await;
        fx.payment(OWNER, 1000, None).await;
        fx.payment(BOB, 2500, Some(&[OWNER, CAROL])).await;
        fx.payment(CAROL, 777, Some(&[BOB])).await;
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let report = handler.handle(query(fx.project_id(), OWNER)).await.unwrap();

        let members = fx.store.list_members(&fx.project_id()).await.unwrap();
        let payments = fx.store.list_payments(&fx.project_id()).await.unwrap();
        let sheet = BalanceAccumulator::compute_balances(&members, &payments);
        let transfers: Vec<Transfer> = report
            .transfers
            .iter()
            .map(|t| Transfer {
                from: t.from.clone(),
                to: t.to.clone(),
                amount: t.amount,
            })
            .collect();

        assert!(apply_transfers(&sheet, &transfers).is_settled(Money::ZERO));
        assert!(transfers.len() <= members.len() - 1);
        assert!(report
            .balances
            .iter()
            .any(|b| b.member_id == member_id(CAROL)));
    }

    #[tokio::test]
    async fn same_ledger_gives_same_report() {
        let fx = project_with_members().await;
        fx.payment(OWNER, 1001, None).await;
        fx.payment(BOB, 333, None).await;
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let first = handler.handle(query(fx.project_id(), OWNER)).await.unwrap();
        let second = handler.handle(query(fx.project_id(), OWNER)).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let fx = project_with_members().await;
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let err = handler.handle(query(fx.project_id(), STRANGER)).await.unwrap_err();

        assert!(matches!(err, LedgerError::Forbidden(_)));
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let fx = project_with_members().await;
        let handler = GetSettlementsHandler::new(fx.store_dyn(), Money::ZERO);

        let err = handler.handle(query(ProjectId::new(), OWNER)).await.unwrap_err();

        assert!(matches!(err, LedgerError::NotFound { .. }));
    }
}
