//! Project aggregate root.
//!
//! A project is one shared-expense group. It owns its member set and payment
//! log (stored separately) and caches the running total of live payments.
//!
//! # Invariants
//!
//! - `total_amount` equals the sum of all live payment amounts
//! - `member_count` equals the number of stored members
//! - `Active -> Settled` is the only status transition
//! - `version` increases by one on every committed write

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    DomainError, ErrorCode, MemberId, Money, ProjectId, Timestamp, UserId, ValidationError,
};

/// Maximum project name length in characters.
pub const MAX_PROJECT_NAME_LEN: usize = 100;

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Payments can be recorded and removed.
    Active,
    /// Read-only. Reached once the group has paid each other back.
    Settled,
}

impl ProjectStatus {
    pub fn can_transition_to(&self, target: &ProjectStatus) -> bool {
        matches!((self, target), (ProjectStatus::Active, ProjectStatus::Settled))
    }

    /// True if the ledger accepts mutations in this status.
    pub fn is_mutable(&self) -> bool {
        matches!(self, ProjectStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Settled => "settled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProjectStatus::Active),
            "settled" => Ok(ProjectStatus::Settled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown project status '{}'", other),
            )),
        }
    }
}

/// Validated project display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Trims the input and checks it is non-empty and not too long.
    pub fn new(name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let len = trimmed.chars().count();
        if len > MAX_PROJECT_NAME_LEN {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_PROJECT_NAME_LEN as i64,
                len as i64,
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A shared-expense project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: ProjectName,
    pub status: ProjectStatus,
    pub owner_member_id: MemberId,
    /// Cached sum of live payment amounts.
    pub total_amount: Money,
    pub member_count: u32,
    /// Optimistic concurrency counter.
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Creates a new active project owned by `owner`, who counts as the first member.
    pub fn create(name: ProjectName, owner: MemberId) -> Self {
        let now = Timestamp::now();
        Self {
            id: ProjectId::new(),
            name,
            status: ProjectStatus::Active,
            owner_member_id: owner,
            total_amount: Money::ZERO,
            member_count: 1,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// True if the given user created this project.
    pub fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_member_id == MemberId::for_user(user_id)
    }

    /// Fails with `ProjectSettled` unless the ledger can still be mutated.
    pub fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.status.is_mutable() {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::ProjectSettled,
                format!("Project {} is settled and read-only", self.id),
            ))
        }
    }

    /// Moves the project to `target`, enforcing the one-way lifecycle.
    pub fn transition_to(&mut self, target: ProjectStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot move project from {} to {}", self.status, target),
            )
            .with_detail("current", self.status.as_str())
            .with_detail("attempted", target.as_str()));
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    /// Applies a signed change to the cached total and bumps the version.
    pub fn apply_total_delta(&mut self, delta: Money) -> Result<(), DomainError> {
        self.total_amount = self.total_amount.checked_add(delta).ok_or_else(|| {
            DomainError::validation("amount", "Project total would overflow")
        })?;
        self.touch();
        Ok(())
    }

    /// Records that one more member joined.
    pub fn record_member_added(&mut self) {
        self.member_count += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new("U-owner").unwrap()
    }

    fn test_project() -> Project {
        Project::create(
            ProjectName::new("Okinawa trip").unwrap(),
            MemberId::for_user(&owner()),
        )
    }

    #[test]
    fn new_project_is_active_and_empty() {
        let project = test_project();
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.total_amount, Money::ZERO);
        assert_eq!(project.member_count, 1);
        assert_eq!(project.version, 0);
    }

    #[test]
    fn project_name_is_trimmed() {
        let name = ProjectName::new("  BBQ  ").unwrap();
        assert_eq!(name.as_str(), "BBQ");
    }

    #[test]
    fn project_name_rejects_blank_and_long() {
        assert!(ProjectName::new("   ").is_err());
        assert!(ProjectName::new("x".repeat(MAX_PROJECT_NAME_LEN + 1)).is_err());
        assert!(ProjectName::new("x".repeat(MAX_PROJECT_NAME_LEN)).is_ok());
    }

    #[test]
    fn owner_is_recognised() {
        let project = test_project();
        assert!(project.is_owner(&owner()));
        assert!(!project.is_owner(&UserId::new("U-other").unwrap()));
    }

    #[test]
    fn total_delta_updates_total_and_version() {
        let mut project = test_project();
        project.apply_total_delta(Money::from_minor(3000)).unwrap();
        project.apply_total_delta(Money::from_minor(-1000)).unwrap();
        assert_eq!(project.total_amount, Money::from_minor(2000));
        assert_eq!(project.version, 2);
    }

    #[test]
    fn settle_is_one_way() {
        let mut project = test_project();
        project.transition_to(ProjectStatus::Settled).unwrap();
        assert!(project.ensure_mutable().is_err());

        let err = project.transition_to(ProjectStatus::Active).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);

        let err = project.transition_to(ProjectStatus::Settled).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("ACTIVE".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert_eq!("settled".parse::<ProjectStatus>().unwrap(), ProjectStatus::Settled);
        assert!("archived".parse::<ProjectStatus>().is_err());
    }
}
