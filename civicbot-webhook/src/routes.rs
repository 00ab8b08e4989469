//! HTTP routes for the fulfillment webhook.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
};
use civicbot_core::FulfillmentService;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::dialogflow::{WebhookRequest, WebhookResponse};

#[derive(Clone)]
struct AppState {
    service: Arc<FulfillmentService>,
}

/// Router serving the webhook on `/` and `/webhook`.
pub(crate) fn router(service: Arc<FulfillmentService>) -> Router {
    Router::new()
        .route("/", post(fulfill))
        .route("/webhook", post(fulfill))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { service })
}

async fn health() -> &'static str {
    "ok"
}

async fn fulfill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<WebhookRequest>,
) -> Json<WebhookResponse> {
    debug!(
        ?headers,
        session = ?body.session,
        response_id = ?body.response_id,
        query = ?body.query_result.query_text,
        "Dialogflow request"
    );

    let request = body.into_inbound();
    debug!(intent = %request.intent_name, parameters = ?request.parameters, "Resolving intent");

    let fulfillment = state.service.fulfill(request.resolve()).await;
    if let Some(failure) = &fulfillment.failure {
        debug!(error = %failure, intent = %request.intent_name, "Replied after a handler failure");
    }

    Json(WebhookResponse::from(fulfillment.reply))
}
