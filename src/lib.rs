//! Warikan - shared-expense ledger and settlement engine
//!
//! Groups record who paid for what inside a project. The crate keeps the
//! ledger consistent under concurrent writers, derives each member's net
//! balance, and proposes a short list of transfers that squares everyone up.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
