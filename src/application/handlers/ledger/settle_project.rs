//! SettleProjectHandler - Command handler for closing a project.
//!
//! Marks the ledger read-only once the group has paid each other back. The
//! transition is one-way.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, ProjectId};
use crate::domain::ledger::{LedgerError, Project, ProjectStatus};
use crate::ports::LedgerStore;

use super::access::{load_project, require_owner};

#[derive(Debug, Clone)]
pub struct SettleProjectCommand {
    pub project_id: ProjectId,
}

pub struct SettleProjectHandler {
    store: Arc<dyn LedgerStore>,
}

impl SettleProjectHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SettleProjectCommand,
        metadata: CommandMetadata,
    ) -> Result<Project, LedgerError> {
        let project = load_project(self.store.as_ref(), &cmd.project_id).await?;
        require_owner(&project, &metadata.user_id)?;
        if project.status != ProjectStatus::Active {
            return Err(LedgerError::invalid_state(format!(
                "project {} is already {}",
                project.id, project.status
            )));
        }

        let project = self
            .store
            .update_status(&project.id, ProjectStatus::Active, ProjectStatus::Settled)
            .await?;

        tracing::info!(
            project_id = %project.id,
            total = project.total_amount.minor_units(),
            correlation_id = metadata.correlation_id(),
            "Project settled"
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ledger::test_support::{meta, project_with_members, BOB, OWNER};

    #[tokio::test]
    async fn owner_settles_once() {
        let fx = project_with_members().await;
        let handler = SettleProjectHandler::new(fx.store_dyn());
        let cmd = SettleProjectCommand {
            project_id: fx.project_id(),
        };

        let project = handler.handle(cmd.clone(), meta(OWNER)).await.unwrap();
        assert_eq!(project.status, ProjectStatus::Settled);

        let err = handler.handle(cmd, meta(OWNER)).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState(_)));
    }

    #[tokio::test]
    async fn member_cannot_settle() {
        let fx = project_with_members().await;
        let handler = SettleProjectHandler::new(fx.store_dyn());

        let err = handler
            .handle(
                SettleProjectCommand {
                    project_id: fx.project_id(),
                },
                meta(BOB),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::Forbidden(_)));
        assert_eq!(fx.current_project().await.status, ProjectStatus::Active);
    }
}
