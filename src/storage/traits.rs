//! Storage trait definition for the shared multi-tenant credential table.
//!
//! The backend is a key-value table offering per-item conditional writes
//! and one secondary index over the sort key; it provides no multi-item
//! transactions.

use crate::errors::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Flat string attribute map carried by a table item.
pub type Attributes = HashMap<String, String>;

/// A single item in the shared table, addressed by partition and sort key.
#[derive(Clone)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct TableItem {
    pub pk: String,
    pub sk: String,
    pub attributes: Attributes,
}

/// Trait for the key-value backend holding credential records.
///
/// Every write is atomic for exactly one item; a failed precondition
/// surfaces as [`StorageError::ConditionFailed`]. Reads after a successful
/// write to the same key observe that write; no ordering is guaranteed
/// across keys.
#[async_trait]
pub trait KeyValueTable: Send + Sync {
    /// Point read of one item
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<TableItem>>;

    /// All items under a partition key, ordered by sort key
    async fn query_partition(&self, pk: &str) -> Result<Vec<TableItem>>;

    /// Resolve an item by sort key alone via the secondary index
    async fn query_index(&self, sk: &str) -> Result<Option<TableItem>>;

    /// Write a new item, conditioned on the key not existing
    async fn put_if_absent(&self, item: TableItem) -> Result<()>;

    /// Set the supplied attributes on an existing item, conditioned on the
    /// key existing; returns the full post-update item
    async fn update_if_present(&self, pk: &str, sk: &str, patch: Attributes) -> Result<TableItem>;

    /// Remove an item, conditioned on the key existing
    async fn delete_if_present(&self, pk: &str, sk: &str) -> Result<()>;
}
