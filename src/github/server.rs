use std::any::Any;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;

use crate::github::webhook::GitHubWebhook;
use crate::relay::{spawn_delivery, RelayClient};

/// Shared server state for all axum handlers.
pub struct ServerState {
    relay: Arc<RelayClient>,
}

impl ServerState {
    pub fn new(relay: Arc<RelayClient>) -> Self {
        Self { relay }
    }
}

pub type ServerStateRef = Arc<ServerState>;

/// Webhooks are accepted with `POST` on any path. Every such request is answered with an empty
/// `200 OK`, including requests that fail internally.
pub fn create_app(state: ServerState) -> Router {
    Router::new()
        .route("/", post(github_webhook_handler))
        .route("/*path", post(github_webhook_handler))
        .layer(ConcurrencyLimitLayer::new(100))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(Arc::new(state))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Router panicked: {err:?}");
    StatusCode::OK.into_response()
}

/// Axum handler that receives a webhook and hands its changes over to the relay.
pub async fn github_webhook_handler(
    State(state): State<ServerStateRef>,
    GitHubWebhook(changes): GitHubWebhook,
) -> impl IntoResponse {
    spawn_delivery(state.relay.clone(), changes);
    StatusCode::OK
}
