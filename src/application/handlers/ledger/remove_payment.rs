//! RemovePaymentHandler - Command handler for deleting a recorded payment.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, PaymentId, ProjectId};
use crate::domain::ledger::{LedgerError, Payment};
use crate::ports::LedgerStore;

use super::access::{load_project, require_active, require_member};

#[derive(Debug, Clone)]
pub struct RemovePaymentCommand {
    pub project_id: ProjectId,
    pub payment_id: PaymentId,
}

pub struct RemovePaymentHandler {
    store: Arc<dyn LedgerStore>,
}

impl RemovePaymentHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Removes the payment and returns the deleted record.
    pub async fn handle(
        &self,
        cmd: RemovePaymentCommand,
        metadata: CommandMetadata,
    ) -> Result<Payment, LedgerError> {
        let project = load_project(self.store.as_ref(), &cmd.project_id).await?;
        require_member(self.store.as_ref(), &project, &metadata.user_id).await?;
        require_active(&project)?;

        let payment = self
            .store
            .delete_payment(&project.id, &cmd.payment_id)
            .await?;

        tracing::info!(
            project_id = %project.id,
            payment_id = %payment.id,
            amount = payment.amount.minor_units(),
            correlation_id = metadata.correlation_id(),
            "Payment removed"
        );
        Ok(payment)
    }
}
