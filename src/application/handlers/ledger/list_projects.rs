//! ListProjectsHandler - Query handler for the caller's projects.

use std::sync::Arc;

use crate::domain::foundation::{ProjectId, UserId, ValidationError};
use crate::domain::ledger::LedgerError;
use crate::ports::{LedgerStore, ProjectPage};

#[derive(Debug, Clone)]
pub struct ListProjectsQuery {
    pub user_id: UserId,
    pub limit: Option<u32>,
    /// Last project id of the previous page.
    pub cursor: Option<ProjectId>,
}

/// Page size bounds for project listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default: u32,
    pub max: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self { default: 20, max: 50 }
    }
}

pub struct ListProjectsHandler {
    store: Arc<dyn LedgerStore>,
    limits: PageLimits,
}

impl ListProjectsHandler {
    pub fn new(store: Arc<dyn LedgerStore>, limits: PageLimits) -> Self {
        Self { store, limits }
    }

    pub async fn handle(&self, query: ListProjectsQuery) -> Result<ProjectPage, LedgerError> {
        let limit = query.limit.unwrap_or(self.limits.default);
        if limit == 0 || limit > self.limits.max {
            return Err(ValidationError::out_of_range(
                "limit",
                1,
                i64::from(self.limits.max),
                i64::from(limit),
            )
            .into());
        }

        Ok(self
            .store
            .list_projects_for_user(&query.user_id, limit, query.cursor.as_ref())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::ledger::test_support::{project_with_members, user, BOB, STRANGER};

    #[tokio::test]
    async fn lists_projects_for_linked_member() {
        let fx = project_with_members().await;
        let handler = ListProjectsHandler::new(fx.store_dyn(), PageLimits::default());

        let page = handler
            .handle(ListProjectsQuery {
                user_id: user(BOB),
                limit: None,
                cursor: None,
            })
            .await
            .unwrap();

        assert_eq!(page.projects.len(), 1);
        assert_eq!(page.projects[0].id, fx.project_id());
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn stranger_sees_nothing() {
        let fx = project_with_members().await;
        let handler = ListProjectsHandler::new(fx.store_dyn(), PageLimits::default());

        let page = handler
            .handle(ListProjectsQuery {
                user_id: user(STRANGER),
                limit: Some(5),
                cursor: None,
            })
            .await
            .unwrap();

        assert!(page.projects.is_empty());
    }

    #[tokio::test]
    async fn limit_out_of_bounds_is_rejected() {
        let fx = project_with_members().await;
        let handler = ListProjectsHandler::new(fx.store_dyn(), PageLimits::default());

        for limit in [0, 51] {
            let err = handler
                .handle(ListProjectsQuery {
                    user_id: user(BOB),
                    limit: Some(limit),
                    cursor: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, LedgerError::ValidationFailed { .. }));
        }
    }
}
