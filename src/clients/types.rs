//! Client credential record types.

use serde::Serialize;

use crate::errors::StorageError;
use crate::storage::traits::Attributes;

/// A machine credential record owned by one tenant.
///
/// `secret_hash`, `android_id`, and `account_id` never appear in any
/// serialized external representation.
#[derive(Clone, Serialize)]
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct Client {
    /// Globally unique identifier, used as the OAuth2 `client_id`
    pub id: String,
    /// Tenant-supplied label, no uniqueness constraint
    pub name: String,
    /// First characters of the current plaintext secret, safe to disclose
    pub secret_prefix: String,
    /// Argon2id hash of the current plaintext secret
    #[serde(skip_serializing)]
    pub secret_hash: String,
    /// System-generated device identifier bound 1:1 at creation
    #[serde(skip_serializing)]
    pub android_id: String,
    /// Owning tenant
    #[serde(skip_serializing)]
    pub account_id: String,
}

impl Client {
    /// Marshal the record into table attributes
    pub(crate) fn to_attributes(&self) -> Attributes {
        Attributes::from([
            ("id".to_string(), self.id.clone()),
            ("secret".to_string(), self.secret_hash.clone()),
            ("secret_prefix".to_string(), self.secret_prefix.clone()),
            ("name".to_string(), self.name.clone()),
            ("android_id".to_string(), self.android_id.clone()),
            ("account_id".to_string(), self.account_id.clone()),
        ])
    }

    /// Unmarshal a record from table attributes
    pub(crate) fn from_attributes(attributes: &Attributes) -> Result<Self, StorageError> {
        let attr = |name: &str| {
            attributes.get(name).cloned().ok_or_else(|| {
                StorageError::InvalidData(format!("missing attribute '{}'", name))
            })
        };

        Ok(Self {
            id: attr("id")?,
            name: attr("name")?,
            secret_prefix: attr("secret_prefix")?,
            secret_hash: attr("secret")?,
            android_id: attr("android_id")?,
            account_id: attr("account_id")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client {
            id: "c1".to_string(),
            name: "Test".to_string(),
            secret_prefix: "abc".to_string(),
            secret_hash: "$argon2id$...".to_string(),
            android_id: "d1".to_string(),
            account_id: "t1".to_string(),
        }
    }

    #[test]
    fn test_serialized_form_hides_credential_fields() {
        let value = serde_json::to_value(client()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["id"], "c1");
        assert_eq!(object["name"], "Test");
        assert_eq!(object["secret_prefix"], "abc");
        assert!(!object.contains_key("secret_hash"));
        assert!(!object.contains_key("secret"));
        assert!(!object.contains_key("android_id"));
        assert!(!object.contains_key("account_id"));
    }

    #[test]
    fn test_attribute_round_trip() {
        let original = client();
        let restored = Client::from_attributes(&original.to_attributes()).unwrap();

        assert_eq!(restored.id, original.id);
        assert_eq!(restored.name, original.name);
        assert_eq!(restored.secret_prefix, original.secret_prefix);
        assert_eq!(restored.secret_hash, original.secret_hash);
        assert_eq!(restored.android_id, original.android_id);
        assert_eq!(restored.account_id, original.account_id);
    }

    #[test]
    fn test_missing_attribute_is_invalid() {
        let mut attributes = client().to_attributes();
        attributes.remove("secret");
        assert!(Client::from_attributes(&attributes).is_err());
    }
}
