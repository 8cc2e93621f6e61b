//! Ledger behaviour tunables

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Ledger configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Attempts per write before a version conflict is reported
    #[serde(default = "default_max_write_attempts")]
    pub max_write_attempts: u32,

    /// Backoff before the second attempt; doubles after each conflict
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Balances within this many minor units of zero need no transfer
    #[serde(default)]
    pub settlement_tolerance: i64,

    /// Project list page size when the caller gives none
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Largest page size a caller may request
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl LedgerConfig {
    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// Validate ledger configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_write_attempts == 0 || self.max_write_attempts > 20 {
            return Err(ValidationError::InvalidWriteAttempts);
        }
        if self.settlement_tolerance < 0 {
            return Err(ValidationError::NegativeTolerance);
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ValidationError::InvalidPageSize);
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: default_max_write_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            settlement_tolerance: 0,
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_max_write_attempts() -> u32 {
    5
}

fn default_retry_base_delay_ms() -> u64 {
    10
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    50
}
