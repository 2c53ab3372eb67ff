//! In-memory key-value table implementation.
//!
//! Suitable for development and testing. Conditional write semantics are
//! atomic under a single lock, matching the per-item atomicity the real
//! backend provides.

use crate::errors::StorageError;
use crate::storage::traits::{Attributes, KeyValueTable, Result, TableItem};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory implementation of the credential table
#[derive(Default)]
pub struct MemoryKvTable {
    // Ordered by (pk, sk) so partition queries come back sorted by sort key.
    items: Mutex<BTreeMap<(String, String), Attributes>>,
}

impl MemoryKvTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn item(pk: &str, sk: &str, attributes: Attributes) -> TableItem {
        TableItem {
            pk: pk.to_string(),
            sk: sk.to_string(),
            attributes,
        }
    }
}

#[async_trait]
impl KeyValueTable for MemoryKvTable {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<TableItem>> {
        let items = self
            .items
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(items
            .get(&(pk.to_string(), sk.to_string()))
            .map(|attributes| Self::item(pk, sk, attributes.clone())))
    }

    async fn query_partition(&self, pk: &str) -> Result<Vec<TableItem>> {
        let items = self
            .items
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(items
            .range((pk.to_string(), String::new())..)
            .take_while(|((item_pk, _), _)| item_pk == pk)
            .map(|((item_pk, item_sk), attributes)| {
                Self::item(item_pk, item_sk, attributes.clone())
            })
            .collect())
    }

    async fn query_index(&self, sk: &str) -> Result<Option<TableItem>> {
        let items = self
            .items
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        Ok(items
            .iter()
            .find(|((_, item_sk), _)| item_sk == sk)
            .map(|((item_pk, item_sk), attributes)| {
                Self::item(item_pk, item_sk, attributes.clone())
            }))
    }

    async fn put_if_absent(&self, item: TableItem) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        let key = (item.pk.clone(), item.sk.clone());
        if items.contains_key(&key) {
            return Err(StorageError::ConditionFailed(format!(
                "{}/{}",
                item.pk, item.sk
            )));
        }
        items.insert(key, item.attributes);
        Ok(())
    }

    async fn update_if_present(&self, pk: &str, sk: &str, patch: Attributes) -> Result<TableItem> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        match items.get_mut(&(pk.to_string(), sk.to_string())) {
            Some(attributes) => {
                attributes.extend(patch);
                Ok(Self::item(pk, sk, attributes.clone()))
            }
            None => Err(StorageError::ConditionFailed(format!("{}/{}", pk, sk))),
        }
    }

    async fn delete_if_present(&self, pk: &str, sk: &str) -> Result<()> {
        let mut items = self
            .items
            .lock()
            .map_err(|e| StorageError::QueryFailed(format!("Lock error: {}", e)))?;
        match items.remove(&(pk.to_string(), sk.to_string())) {
            Some(_) => Ok(()),
            None => Err(StorageError::ConditionFailed(format!("{}/{}", pk, sk))),
        }
    }
}
