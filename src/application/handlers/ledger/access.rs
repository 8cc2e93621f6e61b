//! Project lookup and authorization shared by the ledger handlers.
//!
//! A missing project is always reported before any permission check.

use crate::domain::foundation::{MemberId, ProjectId, UserId};
use crate::domain::ledger::{LedgerError, Member, Project};
use crate::ports::LedgerStore;

/// Loads a project or fails with `NotFound`.
pub(crate) async fn load_project(
    store: &dyn LedgerStore,
    project_id: &ProjectId,
) -> Result<Project, LedgerError> {
    store
        .get_project(project_id)
        .await?
        .ok_or_else(|| LedgerError::project_not_found(project_id))
}

/// Fails with `Forbidden` unless `caller` created the project.
pub(crate) fn require_owner(project: &Project, caller: &UserId) -> Result<(), LedgerError> {
    if project.is_owner(caller) {
        Ok(())
    } else {
        Err(LedgerError::forbidden("only the project owner can do this"))
    }
}

/// Returns the caller's member record, or `Forbidden` if they are not in the project.
pub(crate) async fn require_member(
    store: &dyn LedgerStore,
    project: &Project,
    caller: &UserId,
) -> Result<Member, LedgerError> {
    store
        .find_member(&project.id, &MemberId::for_user(caller))
        .await?
        .ok_or_else(|| LedgerError::forbidden("caller is not a member of this project"))
}

/// Same as `require_member`, for callers that already hold the member list.
pub(crate) fn require_member_in<'a>(
    project: &Project,
    members: &'a [Member],
    caller: &UserId,
) -> Result<Option<&'a Member>, LedgerError> {
    let found = members.iter().find(|m| m.is_user(caller));
    if found.is_some() || project.is_owner(caller) {
        Ok(found)
    } else {
        Err(LedgerError::forbidden("caller is not a member of this project"))
    }
}

/// Fails with `InvalidState` once the project is settled.
pub(crate) fn require_active(project: &Project) -> Result<(), LedgerError> {
    project.ensure_mutable().map_err(LedgerError::from)
}
