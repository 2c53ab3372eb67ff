//! SQLite implementation of the credential table.
//!
//! Suitable for single-instance deployments. Conditional writes map onto
//! single statements whose affected-row count decides whether the
//! precondition held.

use crate::errors::StorageError;
use crate::storage::traits::{Attributes, KeyValueTable, Result, TableItem};
use async_trait::async_trait;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};

/// SQLite-backed credential table
pub struct SqliteKvTable {
    pool: SqlitePool,
}

impl SqliteKvTable {
    /// Create a new SQLite credential table over an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the schema if it does not exist yet
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                pk TEXT NOT NULL,
                sk TEXT NOT NULL,
                attributes TEXT NOT NULL,
                PRIMARY KEY (pk, sk)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        // Secondary index backing tenant-agnostic lookup by sort key.
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_items_sk ON items (sk)")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Convert a row to a table item
    fn row_to_item(row: &SqliteRow) -> Result<TableItem> {
        let pk: String = row
            .try_get("pk")
            .map_err(|e| StorageError::QueryFailed(format!("Failed to get pk: {}", e)))?;
        let sk: String = row
            .try_get("sk")
            .map_err(|e| StorageError::QueryFailed(format!("Failed to get sk: {}", e)))?;
        let attributes_json: String = row
            .try_get("attributes")
            .map_err(|e| StorageError::QueryFailed(format!("Failed to get attributes: {}", e)))?;
        let attributes: Attributes = serde_json::from_str(&attributes_json)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;

        Ok(TableItem { pk, sk, attributes })
    }
}

#[async_trait]
impl KeyValueTable for SqliteKvTable {
    async fn get(&self, pk: &str, sk: &str) -> Result<Option<TableItem>> {
        let row = sqlx::query("SELECT pk, sk, attributes FROM items WHERE pk = ? AND sk = ?")
            .bind(pk)
            .bind(sk)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    async fn query_partition(&self, pk: &str) -> Result<Vec<TableItem>> {
        let rows = sqlx::query("SELECT pk, sk, attributes FROM items WHERE pk = ? ORDER BY sk")
            .bind(pk)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn query_index(&self, sk: &str) -> Result<Option<TableItem>> {
        let row = sqlx::query("SELECT pk, sk, attributes FROM items WHERE sk = ? LIMIT 1")
            .bind(sk)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_item(&row)?)),
            None => Ok(None),
        }
    }

    async fn put_if_absent(&self, item: TableItem) -> Result<()> {
        let attributes_json = serde_json::to_string(&item.attributes)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;

        let result = sqlx::query("INSERT OR IGNORE INTO items (pk, sk, attributes) VALUES (?, ?, ?)")
            .bind(&item.pk)
            .bind(&item.sk)
            .bind(&attributes_json)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ConditionFailed(format!(
                "{}/{}",
                item.pk, item.sk
            )));
        }

        Ok(())
    }

    async fn update_if_present(&self, pk: &str, sk: &str, patch: Attributes) -> Result<TableItem> {
        let patch_json = serde_json::to_string(&patch)
            .map_err(|e| StorageError::SerializationFailed(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE items SET attributes = json_patch(attributes, ?) WHERE pk = ? AND sk = ?",
        )
        .bind(&patch_json)
        .bind(pk)
        .bind(sk)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ConditionFailed(format!("{}/{}", pk, sk)));
        }

        // Read-after-write on the same key observes the write just made.
        self.get(pk, sk).await?.ok_or_else(|| {
            StorageError::QueryFailed(format!("updated item {}/{} missing on re-read", pk, sk))
        })
    }

    async fn delete_if_present(&self, pk: &str, sk: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM items WHERE pk = ? AND sk = ?")
            .bind(pk)
            .bind(sk)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ConditionFailed(format!("{}/{}", pk, sk)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_table() -> SqliteKvTable {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let table = SqliteKvTable::new(pool);
        table.migrate().await.unwrap();
        table
    }

    fn item(pk: &str, sk: &str, name: &str) -> TableItem {
        let mut attributes = Attributes::new();
        attributes.insert("name".to_string(), name.to_string());
        TableItem {
            pk: pk.to_string(),
            sk: sk.to_string(),
            attributes,
        }
    }

    #[tokio::test]
    async fn test_conditional_put_and_get() {
        let table = test_table().await;
        table.put_if_absent(item("a", "1", "one")).await.unwrap();

        let err = table.put_if_absent(item("a", "1", "two")).await.unwrap_err();
        assert!(matches!(err, StorageError::ConditionFailed(_)));

        let found = table.get("a", "1").await.unwrap().unwrap();
        assert_eq!(found.attributes["name"], "one");
    }

    #[tokio::test]
    async fn test_partition_query_ordering() {
        let table = test_table().await;
        table.put_if_absent(item("a", "2", "two")).await.unwrap();
        table.put_if_absent(item("a", "1", "one")).await.unwrap();
        table.put_if_absent(item("b", "9", "other")).await.unwrap();

        let found = table.query_partition("a").await.unwrap();
        let keys: Vec<&str> = found.iter().map(|i| i.sk.as_str()).collect();
        assert_eq!(keys, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_index_lookup() {
        let table = test_table().await;
        table.put_if_absent(item("a", "1", "one")).await.unwrap();

        let found = table.query_index("1").await.unwrap().unwrap();
        assert_eq!(found.pk, "a");
    }

    #[tokio::test]
    async fn test_update_merges_attributes() {
        let table = test_table().await;
        let mut original = item("a", "1", "one");
        original
            .attributes
            .insert("color".to_string(), "red".to_string());
        table.put_if_absent(original).await.unwrap();

        let mut patch = Attributes::new();
        patch.insert("name".to_string(), "renamed".to_string());
        let updated = table.update_if_present("a", "1", patch).await.unwrap();

        assert_eq!(updated.attributes["name"], "renamed");
        assert_eq!(updated.attributes["color"], "red");

        let err = table
            .update_if_present("a", "9", Attributes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::ConditionFailed(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let table = test_table().await;
        table.put_if_absent(item("a", "1", "one")).await.unwrap();

        table.delete_if_present("a", "1").await.unwrap();
        let err = table.delete_if_present("a", "1").await.unwrap_err();
        assert!(matches!(err, StorageError::ConditionFailed(_)));
    }
}
