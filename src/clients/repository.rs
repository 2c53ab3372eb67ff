//! Credential store operations over the shared key-value table.
//!
//! Records live under partition key `Account#<account_id>` and sort key
//! `Client#<id>`; every mutation is a single conditional write. All
//! operations except [`ClientRepository::get_by_id`] are tenant-scoped, and
//! a key owned by a different tenant is indistinguishable from an absent
//! one.

use std::sync::Arc;

use uuid::Uuid;

use crate::clients::types::Client;
use crate::errors::{ClientError, StorageError};
use crate::secrets;
use crate::storage::traits::{Attributes, KeyValueTable, TableItem};

pub type Result<T> = std::result::Result<T, ClientError>;

/// Repository for tenant-owned client credential records
pub struct ClientRepository {
    table: Arc<dyn KeyValueTable>,
}

pub struct ListOptions {
    pub account_id: String,
}

pub struct CreateOptions {
    pub secret: String,
    pub name: String,
    pub android_id: String,
    pub account_id: String,
}

pub struct GetOptions {
    pub account_id: String,
    pub id: String,
}

/// Partial update. `None` means "leave unchanged"; supplying `secret`
/// replaces the stored hash and prefix together.
pub struct UpdateOptions {
    pub account_id: String,
    pub id: String,
    pub name: Option<String>,
    pub secret: Option<String>,
}

pub struct DeleteOptions {
    pub account_id: String,
    pub id: String,
}

fn account_pk(account_id: &str) -> String {
    format!("Account#{}", account_id)
}

fn client_sk(id: &str) -> String {
    format!("Client#{}", id)
}

/// A failed write precondition on an existing-key operation means the key
/// was not there (or not this tenant's).
fn not_found_on_condition(err: StorageError) -> ClientError {
    match err {
        StorageError::ConditionFailed(_) => ClientError::NotFound,
        other => other.into(),
    }
}

impl ClientRepository {
    pub fn new(table: Arc<dyn KeyValueTable>) -> Self {
        Self { table }
    }

    /// List all clients belonging to one tenant, ordered by storage key.
    ///
    /// A tenant with no clients gets an empty list, not an error.
    pub async fn list(&self, opts: ListOptions) -> Result<Vec<Client>> {
        let items = self.table.query_partition(&account_pk(&opts.account_id)).await?;

        items
            .iter()
            .map(|item| Client::from_attributes(&item.attributes).map_err(ClientError::from))
            .collect()
    }

    /// Create a new client with a freshly assigned id.
    ///
    /// The write is conditioned on the key not existing; with random ids a
    /// collision is practically unreachable, but it surfaces as a retryable
    /// internal error rather than overwriting.
    pub async fn create(&self, opts: CreateOptions) -> Result<Client> {
        let secret_hash = secrets::derive_hash(&opts.secret)?;
        let id = Uuid::new_v4().to_string();

        let client = Client {
            id: id.clone(),
            name: opts.name,
            secret_prefix: secrets::secret_prefix(&opts.secret).to_string(),
            secret_hash,
            android_id: opts.android_id,
            account_id: opts.account_id,
        };

        let item = TableItem {
            pk: account_pk(&client.account_id),
            sk: client_sk(&client.id),
            attributes: client.to_attributes(),
        };

        self.table.put_if_absent(item).await.map_err(|err| match err {
            StorageError::ConditionFailed(_) => {
                ClientError::Internal(format!("client id collision on create: {}", id))
            }
            other => other.into(),
        })?;

        Ok(client)
    }

    /// Point read of one client under its owning tenant.
    pub async fn get(&self, opts: GetOptions) -> Result<Client> {
        let item = self
            .table
            .get(&account_pk(&opts.account_id), &client_sk(&opts.id))
            .await?
            .ok_or(ClientError::NotFound)?;

        Ok(Client::from_attributes(&item.attributes)?)
    }

    /// Resolve a client by id alone, ignoring tenant.
    ///
    /// This is the only cross-tenant lookup; it exists for credential
    /// verification by the token-issuing engine and must not be reachable
    /// from tenant-facing operations.
    pub async fn get_by_id(&self, id: &str) -> Result<Client> {
        let item = self
            .table
            .query_index(&client_sk(id))
            .await?
            .ok_or(ClientError::NotFound)?;

        Ok(Client::from_attributes(&item.attributes)?)
    }

    /// Apply a partial update, conditioned on the key existing.
    ///
    /// Returns the full post-update record.
    pub async fn update(&self, opts: UpdateOptions) -> Result<Client> {
        let mut patch = Attributes::new();
        if let Some(name) = opts.name {
            patch.insert("name".to_string(), name);
        }
        if let Some(secret) = opts.secret {
            // Hash and prefix derive from the same plaintext and are always
            // replaced together.
            patch.insert("secret".to_string(), secrets::derive_hash(&secret)?);
            patch.insert(
                "secret_prefix".to_string(),
                secrets::secret_prefix(&secret).to_string(),
            );
        }

        let item = self
            .table
            .update_if_present(&account_pk(&opts.account_id), &client_sk(&opts.id), patch)
            .await
            .map_err(not_found_on_condition)?;

        Ok(Client::from_attributes(&item.attributes)?)
    }

    /// Delete a client, conditioned on the key existing.
    ///
    /// Deliberately not idempotent: a repeat delete of the same key reports
    /// `NotFound` so callers can tell "something happened" from "nothing
    /// there".
    pub async fn delete(&self, opts: DeleteOptions) -> Result<()> {
        self.table
            .delete_if_present(&account_pk(&opts.account_id), &client_sk(&opts.id))
            .await
            .map_err(not_found_on_condition)
    }
}
