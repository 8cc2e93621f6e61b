//! RecordPaymentHandler - Command handler for logging an expense.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, MemberId, Money, ProjectId};
use crate::domain::ledger::{LedgerError, NewPayment, Payment};
use crate::ports::LedgerStore;

use super::access::{load_project, require_active, require_member};

/// Command to record that `payer` paid `amount` on behalf of the group.
///
/// `participants = None` splits the amount across the members that have
/// joined by the time the payment is recorded.
#[derive(Debug, Clone)]
pub struct RecordPaymentCommand {
    pub project_id: ProjectId,
    pub payer: MemberId,
    pub amount: Money,
    pub description: Option<String>,
    pub participants: Option<Vec<MemberId>>,
}

pub struct RecordPaymentHandler {
    store: Arc<dyn LedgerStore>,
}

impl RecordPaymentHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RecordPaymentCommand,
        metadata: CommandMetadata,
    ) -> Result<Payment, LedgerError> {
        let project = load_project(self.store.as_ref(), &cmd.project_id).await?;
        require_member(self.store.as_ref(), &project, &metadata.user_id).await?;
        require_active(&project)?;

        let members = self.store.list_members(&project.id).await?;
        if !members.iter().any(|m| m.id == cmd.payer) {
            return Err(LedgerError::forbidden(format!(
                "payer {} is not a member of this project",
                cmd.payer
            )));
        }

        let new_payment = NewPayment::new(cmd.payer, cmd.amount, cmd.description, cmd.participants)?;
        if let Some(participants) = &new_payment.participants {
            if let Some(unknown) = participants
                .iter()
                .find(|p| !members.iter().any(|m| m.id == **p))
            {
                return Err(LedgerError::validation(
                    "participants",
                    format!("{} is not a member of this project", unknown),
                ));
            }
        }

        let payment = self.store.add_payment(&project.id, new_payment).await?;

        tracing::info!(
            project_id = %project.id,
            payment_id = %payment.id,
            payer = %payment.payer_member_id,
            amount = payment.amount.minor_units(),
            correlation_id = metadata.correlation_id(),
            "Payment recorded"
        );
        Ok(payment)
    }
}
