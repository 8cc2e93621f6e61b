//! Command context for ledger handlers.
//!
//! Every mutating handler takes a `CommandMetadata` alongside its command so the
//! caller identity, the request correlation id, and the entry point ("http",
//! "chat") travel together and end up in the same log lines.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Where a command entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandSource {
    Http,
    Chat,
    Internal,
}

impl CommandSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandSource::Http => "http",
            CommandSource::Chat => "chat",
            CommandSource::Internal => "internal",
        }
    }
}

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The authenticated caller. Authorization checks run against this id.
    pub user_id: UserId,

    /// Links log lines produced by one request.
    correlation_id: String,

    source: CommandSource,
}

impl CommandMetadata {
    /// Creates metadata for a caller with a freshly generated correlation id.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: Uuid::new_v4().to_string(),
            source: CommandSource::Internal,
        }
    }

    /// Builder: use an upstream correlation id (e.g. a request id header).
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Builder: record the entry point.
    pub fn with_source(mut self, source: CommandSource) -> Self {
        self.source = source;
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn source(&self) -> CommandSource {
        self.source
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture for the given caller.
    pub fn test_fixture(user_id: &str) -> Self {
        Self::new(UserId::new(user_id).unwrap())
            .with_correlation_id("test-correlation-id")
            .with_source(CommandSource::Internal)
    }
}
