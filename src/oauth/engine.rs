//! The narrow client-lookup contract consumed by the external OAuth2
//! protocol engine during credential verification.
//!
//! The engine resolves a presented `client_id` without knowing the owning
//! tenant, verifies the presented plaintext secret against the stored hash,
//! and embeds the resolved tenant and device identifiers into issued token
//! claims. Token formats, signing, and grant validation all live in the
//! engine itself, not here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clients::{Client, ClientRepository};
use crate::errors::ClientError;
use crate::secrets;

/// Grant types the platform issues tokens for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    ClientCredentials,
}

/// A stored client as the protocol engine sees it.
///
/// One concrete type carrying the full capability set the engine needs; no
/// downcasting to richer interfaces.
#[derive(Debug)]
pub struct RegisteredClient {
    client: Client,
}

impl RegisteredClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Stable identifier presented as `client_id`
    pub fn client_id(&self) -> &str {
        &self.client.id
    }

    /// Stored secret hash used for credential verification
    pub fn secret_hash(&self) -> &str {
        &self.client.secret_hash
    }

    /// Owning tenant, embedded into issued token claims
    pub fn account_id(&self) -> &str {
        &self.client.account_id
    }

    /// Device identifier, embedded into issued token claims
    pub fn android_id(&self) -> &str {
        &self.client.android_id
    }

    /// Grant types this client may use; only `client_credentials` exists
    pub fn grant_types(&self) -> &'static [GrantType] {
        &[GrantType::ClientCredentials]
    }

    /// Confidential clients only
    pub fn is_public(&self) -> bool {
        false
    }

    /// Verify a presented plaintext secret against the stored hash
    pub fn verify_secret(&self, presented: &str) -> Result<bool, ClientError> {
        secrets::verify_hash(presented, &self.client.secret_hash)
    }
}

/// Claims the engine embeds into tokens issued for a client.
#[derive(Clone, Serialize)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct SessionClaims {
    /// Token subject: the client id
    pub subject: String,
    pub account_id: String,
    pub android_id: String,
}

impl SessionClaims {
    pub fn for_client(client: &RegisteredClient) -> Self {
        Self {
            subject: client.client_id().to_string(),
            account_id: client.account_id().to_string(),
            android_id: client.android_id().to_string(),
        }
    }
}

/// Client lookup surface handed to the protocol engine.
///
/// `get_client` is the only operation; it is tenant-agnostic by design and
/// must never be wired into tenant-facing request paths.
pub struct EngineStore {
    repository: Arc<ClientRepository>,
}

impl EngineStore {
    pub fn new(repository: Arc<ClientRepository>) -> Self {
        Self { repository }
    }

    /// Resolve a client by id. Unknown ids are `NotFound`, which the engine
    /// reports as an unknown client.
    pub async fn get_client(&self, client_id: &str) -> Result<RegisteredClient, ClientError> {
        let client = self.repository.get_by_id(client_id).await?;
        Ok(RegisteredClient::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::CreateOptions;
    use crate::storage::inmemory::MemoryKvTable;
    use uuid::Uuid;

    async fn store_with_client(secret: &str) -> (EngineStore, Client) {
        let repository = Arc::new(ClientRepository::new(Arc::new(MemoryKvTable::new())));
        let client = repository
            .create(CreateOptions {
                secret: secret.to_string(),
                name: "Engine Test".to_string(),
                android_id: Uuid::new_v4().to_string(),
                account_id: "tenant-a".to_string(),
            })
            .await
            .unwrap();
        (EngineStore::new(repository), client)
    }

    #[tokio::test]
    async fn test_get_client_resolves_without_tenant() {
        let (store, created) = store_with_client("engine-secret-value-000000001").await;

        let registered = store.get_client(&created.id).await.unwrap();
        assert_eq!(registered.client_id(), created.id);
        assert_eq!(registered.account_id(), "tenant-a");
        assert_eq!(registered.android_id(), created.android_id);
        assert_eq!(registered.secret_hash(), created.secret_hash);
        assert_eq!(registered.grant_types(), &[GrantType::ClientCredentials]);
        assert!(!registered.is_public());
    }

    #[tokio::test]
    async fn test_get_client_unknown_id() {
        let (store, _) = store_with_client("engine-secret-value-000000002").await;

        let err = store
            .get_client(&Uuid::new_v4().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound));
    }

    #[tokio::test]
    async fn test_verify_secret() {
        let (store, created) = store_with_client("engine-secret-value-000000003").await;

        let registered = store.get_client(&created.id).await.unwrap();
        assert!(registered.verify_secret("engine-secret-value-000000003").unwrap());
        assert!(!registered.verify_secret("engine-secret-value-999999999").unwrap());
    }

    #[tokio::test]
    async fn test_session_claims_carry_client_identity() {
        let (store, created) = store_with_client("engine-secret-value-000000004").await;

        let registered = store.get_client(&created.id).await.unwrap();
        let claims = SessionClaims::for_client(&registered);
        let copy = claims.clone();

        assert_eq!(copy.subject, created.id);
        assert_eq!(copy.account_id, "tenant-a");
        assert_eq!(copy.android_id, created.android_id);
    }

    #[test]
    fn test_grant_type_serialized_form() {
        let value = serde_json::to_value(GrantType::ClientCredentials).unwrap();
        assert_eq!(value, "client_credentials");
    }
}
