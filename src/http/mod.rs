//! Axum HTTP server handlers for the tenant-facing client credential API.

pub mod account;
pub mod context;
mod handler_clients;
mod handler_health;
pub mod server;

pub use context::AppState;
pub use server::build_router;
