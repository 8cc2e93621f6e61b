//! CreateProjectHandler - Command handler for starting a new project.

use std::sync::Arc;

use crate::domain::foundation::CommandMetadata;
use crate::domain::ledger::{LedgerError, NewMember, Project, ProjectName, DEFAULT_OWNER_DISPLAY_NAME};
use crate::ports::LedgerStore;

/// Command to create a project. The caller becomes its owner and first member.
#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub name: String,
    /// Owner's display name. Falls back to a generic label.
    pub display_name: Option<String>,
}

pub struct CreateProjectHandler {
    store: Arc<dyn LedgerStore>,
}

impl CreateProjectHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: CreateProjectCommand,
        metadata: CommandMetadata,
    ) -> Result<Project, LedgerError> {
        let name = ProjectName::new(&cmd.name)?;
        let display_name = cmd
            .display_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER_DISPLAY_NAME.to_string());
        let owner = NewMember::linked(metadata.user_id.clone(), display_name)?;

        let project = self.store.create_project(&owner, name.as_str()).await?;

        tracing::info!(
            project_id = %project.id,
            owner = %metadata.user_id,
            correlation_id = metadata.correlation_id(),
            "Project created"
        );
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryLedgerStore;
    use crate::application::handlers::ledger::test_support::{meta, OWNER};
    use crate::domain::foundation::Money;
    use crate::domain::ledger::ProjectStatus;

    fn handler() -> (CreateProjectHandler, Arc<InMemoryLedgerStore>) {
        let store = Arc::new(InMemoryLedgerStore::new());
        (CreateProjectHandler::new(store.clone()), store)
    }

    #[tokio::test]
    async fn creates_active_project_with_owner_member() {
        let (handler, store) = handler();

        let project = handler
            .handle(
                CreateProjectCommand {
                    name: "Ski trip".to_string(),
                    display_name: Some("Alice".to_string()),
                },
                meta(OWNER),
            )
            .await
            .unwrap();

        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.total_amount, Money::ZERO);
        assert_eq!(project.owner_member_id.as_str(), OWNER);

        let members = store.list_members(&project.id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display_name, "Alice");
        assert!(!members[0].is_guest);
    }

    #[tokio::test]
    async fn missing_display_name_uses_default() {
        let (handler, store) = handler();

        let project = handler
            .handle(
                CreateProjectCommand {
                    name: "Ski trip".to_string(),
                    display_name: None,
                },
                meta(OWNER),
            )
            .await
            .unwrap();

        let members = store.list_members(&project.id).await.unwrap();
        assert_eq!(members[0].display_name, DEFAULT_OWNER_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (handler, store) = handler();

        let err = handler
            .handle(
                CreateProjectCommand {
                    name: "   ".to_string(),
                    display_name: None,
                },
                meta(OWNER),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::ValidationFailed { .. }));
        assert_eq!(store.project_count().await, 0);
    }
}
