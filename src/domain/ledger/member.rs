//! Project members.
//!
//! Members are append-only: once added they stay, so payments that name them
//! keep resolving. Balances are never stored on the member.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MemberId, ProjectId, Timestamp, UserId, ValidationError};

/// Maximum member display name length in characters.
pub const MAX_DISPLAY_NAME_LEN: usize = 50;

/// Display name used for the creator when the identity provider gave none.
pub const DEFAULT_OWNER_DISPLAY_NAME: &str = "Owner";

/// A member about to be added to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub id: MemberId,
    pub display_name: String,
    pub external_user_id: Option<UserId>,
}

impl NewMember {
    /// A member linked to an external identity. The member id is the user id.
    pub fn linked(user_id: UserId, display_name: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: MemberId::for_user(&user_id),
            display_name: validate_display_name(display_name.as_ref())?,
            external_user_id: Some(user_id),
        })
    }

    /// A guest with no external identity and a generated member id.
    pub fn guest(display_name: impl AsRef<str>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: MemberId::new_guest(),
            display_name: validate_display_name(display_name.as_ref())?,
            external_user_id: None,
        })
    }

    /// Materializes the stored member record.
    pub fn into_member(self, project_id: ProjectId) -> Member {
        Member {
            id: self.id,
            project_id,
            display_name: self.display_name,
            is_guest: self.external_user_id.is_none(),
            external_user_id: self.external_user_id,
            added_at: Timestamp::now(),
        }
    }
}

/// A participant in a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub project_id: ProjectId,
    pub display_name: String,
    pub external_user_id: Option<UserId>,
    /// Guests have no external identity and cannot authenticate.
    pub is_guest: bool,
    pub added_at: Timestamp,
}

impl Member {
    /// True if this member is the given authenticated user.
    pub fn is_user(&self, user_id: &UserId) -> bool {
        self.external_user_id.as_ref() == Some(user_id)
    }
}

fn validate_display_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("display_name"));
    }
    let len = trimmed.chars().count();
    if len > MAX_DISPLAY_NAME_LEN {
        return Err(ValidationError::out_of_range(
            "display_name",
            1,
            MAX_DISPLAY_NAME_LEN as i64,
            len as i64,
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linked_member_uses_user_id() {
        let user = UserId::new("U-hanako").unwrap();
        let member = NewMember::linked(user.clone(), "Hanako")
            .unwrap()
            .into_member(ProjectId::new());

        assert_eq!(member.id.as_str(), "U-hanako");
        assert!(!member.is_guest);
        assert!(member.is_user(&user));
    }

    #[test]
    fn guest_member_has_generated_id() {
        let member = NewMember::guest("Taro").unwrap().into_member(ProjectId::new());

        assert!(member.is_guest);
        assert!(member.id.is_guest());
        assert!(member.external_user_id.is_none());
    }

    #[test]
    fn display_name_is_validated() {
        assert!(NewMember::guest("  ").is_err());
        assert!(NewMember::guest("a".repeat(MAX_DISPLAY_NAME_LEN + 1)).is_err());
        assert_eq!(NewMember::guest(" Jiro ").unwrap().display_name, "Jiro");
    }
}
