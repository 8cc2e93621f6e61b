//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, money, and error types
//! that form the vocabulary of the warikan ledger.

mod auth;
mod command;
mod errors;
mod ids;
mod money;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::{CommandMetadata, CommandSource};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MemberId, PaymentId, ProjectId, UserId, GUEST_MEMBER_PREFIX};
pub use money::Money;
pub use timestamp::Timestamp;
