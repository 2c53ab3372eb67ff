//! Application state shared across request handlers.

use std::sync::Arc;

use crate::clients::ClientRepository;
use crate::config::Config;

/// State constructed once at process start and passed by reference into
/// every request-handling path.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Credential store backing the tenant-facing client API
    pub repository: Arc<ClientRepository>,
}
