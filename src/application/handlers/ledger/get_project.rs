//! GetProjectHandler - Query handler for a project and its members.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{ProjectId, UserId};
use crate::domain::ledger::{LedgerError, Member, Project};
use crate::ports::LedgerStore;

use super::access::{load_project, require_member_in};

#[derive(Debug, Clone)]
pub struct GetProjectQuery {
    pub project_id: ProjectId,
    pub user_id: UserId,
}

/// A project with its members in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetails {
    pub project: Project,
    pub members: Vec<Member>,
}

pub struct GetProjectHandler {
    store: Arc<dyn LedgerStore>,
}

impl GetProjectHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetProjectQuery) -> Result<ProjectDetails, LedgerError> {
        let project = load_project(self.store.as_ref(), &query.project_id).await?;
        let members = self.store.list_members(&project.id).await?;
        require_member_in(&project, &members, &query.user_id)?;

        Ok(ProjectDetails { project, members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ledger::test_support::{
        project_with_members, user, CAROL, STRANGER,
    };

    #[tokio::test]
    async fn member_sees_project_and_members() {
        let fx = project_with_members().await;
        let handler = GetProjectHandler::new(fx.store_dyn());

        let details = handler
            .handle(GetProjectQuery {
                project_id: fx.project_id(),
                user_id: user(CAROL),
            })
            .await
            .unwrap();

        assert_eq!(details.project.id, fx.project_id());
        let names: Vec<&str> = details.members.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let fx = project_with_members().await;
        let handler = GetProjectHandler::new(fx.store_dyn());

        let err = handler
            .handle(GetProjectQuery {
                project_id: fx.project_id(),
                user_id: user(STRANGER),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::Forbidden(_)));
    }
}
