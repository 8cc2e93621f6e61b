//! AddMemberHandler - Command handler for adding people to a project.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, MemberId, ProjectId, UserId};
use crate::domain::ledger::{LedgerError, Member, NewMember};
use crate::ports::LedgerStore;

use super::access::{load_project, require_active, require_owner};

/// Command to add a member.
///
/// Without `external_user_id` the member is a guest: someone who takes part in
/// the split but has no account of their own.
#[derive(Debug, Clone)]
pub struct AddMemberCommand {
    pub project_id: ProjectId,
    pub display_name: String,
    pub external_user_id: Option<UserId>,
}

pub struct AddMemberHandler {
    store: Arc<dyn LedgerStore>,
}

impl AddMemberHandler {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: AddMemberCommand,
        metadata: CommandMetadata,
    ) -> Result<Member, LedgerError> {
        let project = load_project(self.store.as_ref(), &cmd.project_id).await?;
        require_owner(&project, &metadata.user_id)?;
        require_active(&project)?;

        let new_member = match cmd.external_user_id {
            Some(user_id) => {
                let existing = self
                    .store
                    .find_member(&project.id, &MemberId::for_user(&user_id))
                    .await?;
                if existing.is_some() {
                    return Err(LedgerError::validation(
                        "external_user_id",
                        format!("{} is already a member of this project", user_id),
                    ));
                }
                NewMember::linked(user_id, &cmd.display_name)?
            }
            None => NewMember::guest(&cmd.display_name)?,
        };

        let member = self.store.add_member(&project.id, new_member).await?;

        tracing::info!(
            project_id = %project.id,
            member_id = %member.id,
            guest = member.is_guest,
            correlation_id = metadata.correlation_id(),
            "Member added"
        );
        Ok(member)
    }
}
