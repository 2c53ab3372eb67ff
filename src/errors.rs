//! Standardized error types following the `error-mcs-<domain>-<number>` format.

use thiserror::Error;

/// Configuration errors that occur during application startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a required environment variable is not set
    #[error("error-mcs-config-1 {0} must be set")]
    EnvVarRequired(String),

    /// Error when PORT cannot be parsed
    #[error("error-mcs-config-2 Parsing PORT into u16 failed: {0:?}")]
    PortParsingFailed(std::num::ParseIntError),

    /// Error when version information is not available
    #[error("error-mcs-config-3 One of GIT_HASH or CARGO_PKG_VERSION must be set")]
    VersionNotSet,
}

/// Key-value backend errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when the backend connection fails
    #[error("error-mcs-storage-1 Backend connection failed: {0}")]
    ConnectionFailed(String),

    /// Error when a read or write against the backend fails
    #[error("error-mcs-storage-2 Query execution failed: {0}")]
    QueryFailed(String),

    /// Error when item attributes cannot be serialized or deserialized
    #[error("error-mcs-storage-3 Attribute serialization failed: {0}")]
    SerializationFailed(String),

    /// Error when a conditional write's precondition does not hold
    #[error("error-mcs-storage-4 Condition failed for item {0}")]
    ConditionFailed(String),

    /// Error when stored data fails validation
    #[error("error-mcs-storage-5 Invalid data: {0}")]
    InvalidData(String),
}

/// Credential store error taxonomy shared by the repository and its callers.
///
/// A missing key and a tenant mismatch both surface as `NotFound`, with no
/// distinguishing detail.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Record absent, or present under a different tenant
    #[error("error-mcs-client-1 Not found")]
    NotFound,

    /// Malformed caller input
    #[error("error-mcs-client-2 '{0}' not valid")]
    InvalidArgument(String),

    /// Tenant identifier header absent from the request
    #[error("error-mcs-client-3 Header '{0}' is required")]
    RequiredHeaderMissing(String),

    /// Backend, hashing, or random-generation failure
    #[error("error-mcs-client-4 Internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for ClientError {
    fn from(err: StorageError) -> Self {
        ClientError::Internal(err.to_string())
    }
}
