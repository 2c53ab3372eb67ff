//! Trait-based key-value table abstraction with in-memory and SQLite backends.

pub mod inmemory;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::MemoryKvTable;
pub use traits::*;

use crate::errors::StorageError;
use std::sync::Arc;

/// Storage backend configuration and factory
#[derive(Clone)]
pub enum StorageBackend {
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite(String), // Connection string/path
}

/// Create a key-value table based on configuration
pub async fn create_kv_table(
    backend: StorageBackend,
) -> std::result::Result<Arc<dyn KeyValueTable>, StorageError> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryKvTable::new())),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite(database_url) => {
            let pool = sqlx::SqlitePool::connect(&database_url)
                .await
                .map_err(|e| {
                    StorageError::ConnectionFailed(format!("SQLite connection failed: {}", e))
                })?;

            let table = sqlite::SqliteKvTable::new(pool);
            table.migrate().await?;

            Ok(Arc::new(table))
        }
    }
}

/// Parse storage backend from configuration string
pub fn parse_storage_backend(
    backend_name: &str,
    database_url: Option<&str>,
) -> std::result::Result<StorageBackend, StorageError> {
    match backend_name {
        "memory" => Ok(StorageBackend::Memory),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let url = database_url.unwrap_or("sqlite:mcs.db");
            Ok(StorageBackend::Sqlite(url.to_string()))
        }
        _ => Err(StorageError::InvalidData(format!(
            "Unknown storage backend: {}",
            backend_name
        ))),
    }
}
