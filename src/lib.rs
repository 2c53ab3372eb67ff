//! Machine credential service (MCS) library crate.
//!
//! Issues and manages OAuth2 client-credentials machine identities for a
//! multi-tenant platform, persisted in a shared key-value table with
//! per-item conditional writes.

pub mod clients;
pub mod config;
pub mod errors;
pub mod http;
pub mod oauth;
pub mod secrets;
pub mod storage;
