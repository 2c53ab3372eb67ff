//! Handlers for the tenant-facing /clients API.

use axum::{
    extract::{Json, Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    clients::{
        Client, CreateOptions, DeleteOptions, GetOptions, ListOptions, UpdateOptions,
    },
    errors::ClientError,
    http::account::AccountId,
    http::context::AppState,
    secrets,
};

/// Map a store error onto a transport response; the store itself never
/// logs, so internal failures are logged here with request context.
fn client_error_response(err: &ClientError) -> (StatusCode, ResponseJson<Value>) {
    let (status, error_code, description) = match err {
        ClientError::NotFound => (StatusCode::NOT_FOUND, "not_found", err.to_string()),
        ClientError::InvalidArgument(_) => {
            (StatusCode::BAD_REQUEST, "invalid_argument", err.to_string())
        }
        ClientError::RequiredHeaderMissing(_) => (
            StatusCode::BAD_REQUEST,
            "required_header_missing",
            err.to_string(),
        ),
        ClientError::Internal(_) => {
            tracing::error!(error = ?err, "client operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "server_error",
                "Internal server error".to_string(),
            )
        }
    };

    (
        status,
        ResponseJson(json!({
            "error": error_code,
            "error_description": description
        })),
    )
}

#[derive(Serialize)]
pub struct ListClientsResponse {
    pub records: Vec<Client>,
}

pub async fn list_clients_handler(
    State(state): State<AppState>,
    account: AccountId,
) -> Result<ResponseJson<ListClientsResponse>, (StatusCode, ResponseJson<Value>)> {
    match state
        .repository
        .list(ListOptions {
            account_id: account.0,
        })
        .await
    {
        Ok(records) => Ok(ResponseJson(ListClientsResponse { records })),
        Err(e) => Err(client_error_response(&e)),
    }
}

#[derive(Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
}

/// The only response that ever carries the plaintext secret.
#[derive(Serialize)]
pub struct CreateClientResponse {
    pub id: String,
    pub name: String,
    pub secret: String,
}

pub async fn create_client_handler(
    State(state): State<AppState>,
    account: AccountId,
    request: Result<Json<CreateClientRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<CreateClientResponse>), (StatusCode, ResponseJson<Value>)> {
    let Json(request) = request.map_err(|_| {
        client_error_response(&ClientError::InvalidArgument("name".to_string()))
    })?;

    // TODO accept an external android_id supplied by the account service
    // once that integration exists; until then one is generated here.
    let android_id = Uuid::new_v4().to_string();

    let secret = secrets::generate_secret().map_err(|e| client_error_response(&e))?;

    match state
        .repository
        .create(CreateOptions {
            secret: secret.clone(),
            name: request.name,
            android_id,
            account_id: account.0,
        })
        .await
    {
        Ok(client) => {
            tracing::info!(client_id = %client.id, "created client");
            Ok((
                StatusCode::CREATED,
                ResponseJson(CreateClientResponse {
                    id: client.id,
                    name: client.name,
                    secret,
                }),
            ))
        }
        Err(e) => Err(client_error_response(&e)),
    }
}

pub async fn get_client_handler(
    State(state): State<AppState>,
    account: AccountId,
    Path(id): Path<String>,
) -> Result<ResponseJson<Client>, (StatusCode, ResponseJson<Value>)> {
    match state
        .repository
        .get(GetOptions {
            account_id: account.0,
            id,
        })
        .await
    {
        Ok(client) => Ok(ResponseJson(client)),
        Err(e) => Err(client_error_response(&e)),
    }
}

/// Rename request; an omitted name means "no change".
#[derive(Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
}

pub async fn update_client_handler(
    State(state): State<AppState>,
    account: AccountId,
    Path(id): Path<String>,
    request: Result<Json<UpdateClientRequest>, JsonRejection>,
) -> Result<ResponseJson<Client>, (StatusCode, ResponseJson<Value>)> {
    let Json(request) = request.map_err(|_| {
        client_error_response(&ClientError::InvalidArgument("name".to_string()))
    })?;

    match state
        .repository
        .update(UpdateOptions {
            account_id: account.0,
            id,
            name: request.name,
            secret: None,
        })
        .await
    {
        Ok(client) => Ok(ResponseJson(client)),
        Err(e) => Err(client_error_response(&e)),
    }
}

#[derive(Serialize)]
pub struct RotateSecretResponse {
    pub secret: String,
}

pub async fn rotate_client_secret_handler(
    State(state): State<AppState>,
    account: AccountId,
    Path(id): Path<String>,
) -> Result<ResponseJson<RotateSecretResponse>, (StatusCode, ResponseJson<Value>)> {
    let secret = secrets::generate_secret().map_err(|e| client_error_response(&e))?;

    match state
        .repository
        .update(UpdateOptions {
            account_id: account.0,
            id,
            name: None,
            secret: Some(secret.clone()),
        })
        .await
    {
        Ok(client) => {
            tracing::info!(client_id = %client.id, "rotated client secret");
            Ok(ResponseJson(RotateSecretResponse { secret }))
        }
        Err(e) => Err(client_error_response(&e)),
    }
}

pub async fn delete_client_handler(
    State(state): State<AppState>,
    account: AccountId,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, ResponseJson<Value>)> {
    match state
        .repository
        .delete(DeleteOptions {
            account_id: account.0,
            id,
        })
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(client_error_response(&e)),
    }
}
