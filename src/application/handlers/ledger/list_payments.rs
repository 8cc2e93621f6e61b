//! ListPaymentsHandler - Query handler for a project's payment log.

use std::sync::Arc;

use crate::domain::foundation::{ProjectId, UserId};
use crate::domain::ledger::{LedgerError, Payment};
use crate::ports::LedgerStore;

use super::access::{load_project, require_member};

#[derive(Debug, Clone)]
pub struct ListPaymentsQuery {
    pub project_id: ProjectId,
    pub user_id: UserId,
}

pub struct ListPaymentsHandler {
    store: Arc<dyn LedgerStore>,
}

impl ListPaymentsHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Payments in the order they were recorded.
    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Payment>, LedgerError> {
        let project = load_project(self.store.as_ref(), &query.project_id).await?;
        require_member(self.store.as_ref(), &project, &query.user_id).await?;

        Ok(self.store.list_payments(&project.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ledger::test_support::{
        project_with_members, user, BOB, OWNER, STRANGER,
    };

    #[tokio::test]
    async fn payments_come_back_in_creation_order() {
        let fx = project_with_members().await;
        let first = fx.payment(OWNER, 100, None).await;
        let second = fx.payment(BOB, 200, None).await;
        let handler = ListPaymentsHandler::new(fx.store_dyn());

        let payments = handler
            .handle(ListPaymentsQuery {
                project_id: fx.project_id(),
                user_id: user(BOB),
            })
            .await
            .unwrap();

        let ids: Vec<_> = payments.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let fx = project_with_members().await;
        let handler = ListPaymentsHandler::new(fx.store_dyn());

        let err = handler
            .handle(ListPaymentsQuery {
                project_id: fx.project_id(),
                user_id: user(STRANGER),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::Forbidden(_)));
    }
}
