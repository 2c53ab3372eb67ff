//! Tenant identity extraction.
//!
//! The upstream gateway authenticates the caller and forwards the tenant
//! identifier in a request header; this extractor only checks presence.
//! Handlers pass the extracted value explicitly into every store call —
//! nothing below the HTTP layer reads ambient request state.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use http::request::Parts;
use serde_json::{Value, json};

use crate::errors::ClientError;

/// Header carrying the authenticated tenant identifier, set by the gateway
/// from the verified `account_id` token claim.
pub const ACCOUNT_ID_HEADER: &str = "X-Account-ID";

/// Authenticated tenant identifier for the current request
#[cfg_attr(any(debug_assertions, test), derive(Debug))]
pub struct AccountId(pub String);

impl<S> FromRequestParts<S> for AccountId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts
            .headers
            .get(ACCOUNT_ID_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            Some(value) if !value.is_empty() => Ok(AccountId(value.to_string())),
            _ => {
                let err = ClientError::RequiredHeaderMissing(ACCOUNT_ID_HEADER.to_string());
                Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "required_header_missing",
                        "error_description": err.to_string()
                    })),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn extract(request: http::Request<()>) -> Result<AccountId, StatusCode> {
        let (mut parts, _) = request.into_parts();
        AccountId::from_request_parts(&mut parts, &())
            .await
            .map_err(|(status, _)| status)
    }

    #[tokio::test]
    async fn test_present_header_is_extracted() {
        let request = http::Request::builder()
            .header(ACCOUNT_ID_HEADER, "tenant-a")
            .body(())
            .unwrap();

        let account = extract(request).await.unwrap();
        assert_eq!(account.0, "tenant-a");
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected() {
        let request = http::Request::builder().body(()).unwrap();
        assert_eq!(extract(request).await.unwrap_err(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_header_is_rejected() {
        let request = http::Request::builder()
            .header(ACCOUNT_ID_HEADER, "")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.unwrap_err(), StatusCode::BAD_REQUEST);
    }
}
