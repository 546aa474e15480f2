use super::AppState;
use crate::error::MarketError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;
use std::sync::Arc;

/// The authenticated caller's email, as asserted by the fronting identity
/// provider in the configured header. `None` for anonymous requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Option<String>);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let email = parts
            .headers
            .get(&state.identity_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(Self(email))
    }
}

/// A caller on the admin allow-list. Extraction fails with 401 otherwise,
/// before any request body is read.
#[derive(Debug, Clone)]
pub struct Admin(pub String);

impl FromRequestParts<Arc<AppState>> for Admin {
    type Rejection = MarketError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Caller(email) = Caller::from_request_parts(parts, state)
            .await
            .unwrap_or(Caller(None));
        state.admins.require_admin(email.as_deref())?;
        Ok(Self(email.unwrap_or_default()))
    }
}
