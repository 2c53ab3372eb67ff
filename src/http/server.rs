//! Main router configuration assembling the client API endpoints.

use axum::{
    Router,
    routing::{get, patch},
};
use tower_http::trace::TraceLayer;

use super::{
    context::AppState,
    handler_clients::{
        create_client_handler, delete_client_handler, get_client_handler, list_clients_handler,
        rotate_client_secret_handler, update_client_handler,
    },
    handler_health::health_handler,
};

/// Build the application router
pub fn build_router(ctx: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/clients",
            get(list_clients_handler).post(create_client_handler),
        )
        .route(
            "/clients/{id}",
            get(get_client_handler)
                .patch(update_client_handler)
                .delete(delete_client_handler),
        )
        .route("/clients/{id}/secret", patch(rotate_client_secret_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
