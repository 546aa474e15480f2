use super::AppState;
use crate::application::WebhookOutcome;
use crate::error::Result;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Receives provider events. The raw body is needed verbatim for the
/// signature check, so it is taken as bytes and parsed afterwards.
pub async fn stripe_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    match state.webhooks.handle(&body, signature).await? {
        WebhookOutcome::SessionCreated(session) => {
            debug!(session_id = %session.id, "Webhook acknowledged with new session");
        }
        WebhookOutcome::Duplicate(session) => {
            debug!(session_id = %session.id, "Webhook acknowledged as duplicate");
        }
        WebhookOutcome::Ignored(event_type) => {
            debug!(%event_type, "Webhook acknowledged without action");
        }
    }
    Ok(Json(json!({ "received": true })))
}
