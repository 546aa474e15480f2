use super::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

/// Page namespaces hidden until the public beta opens.
const GATED_PREFIXES: [&str; 3] = ["/professionals", "/admin", "/booking"];

/// Whether `path` falls under a gated page namespace. Matching is a plain
/// prefix test, so `/professionalsx` is gated too. API routes and the
/// waitlist are never gated.
pub fn is_gated(path: &str) -> bool {
    GATED_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Redirects gated pages to `/` while the beta is closed.
pub async fn beta_gate(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    if !state.public_beta && is_gated(request.uri().path()) {
        return Redirect::temporary("/").into_response();
    }
    next.run(request).await
}
