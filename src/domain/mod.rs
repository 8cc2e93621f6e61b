//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, money, errors)
//! - `ledger` - Projects, members, payments, balance accumulation and settlement

pub mod foundation;
pub mod ledger;
