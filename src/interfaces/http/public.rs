use super::AppState;
use crate::domain::booking::BookingSubmission;
use crate::domain::checkout::{CheckoutRedirect, CheckoutSubmission};
use crate::domain::profile::{ProfessionalProfile, ProfileFacets, ProfileFilter};
use crate::domain::session::SessionConfirmation;
use crate::domain::validation::parse_json;
use crate::domain::waitlist::WaitlistForm;
use crate::error::{MarketError, Result};
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn list_professionals(
    State(state): State<Arc<AppState>>,
    filter: std::result::Result<Query<ProfileFilter>, QueryRejection>,
) -> Result<Json<Vec<ProfessionalProfile>>> {
    let Query(filter) =
        filter.map_err(|_| MarketError::Validation("Invalid query parameters".to_string()))?;
    Ok(Json(state.directory.list_approved(&filter).await?))
}

pub async fn professional_facets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProfileFacets>> {
    Ok(Json(state.directory.facets().await?))
}

pub async fn get_professional(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ProfessionalProfile>> {
    Ok(Json(state.directory.get_public(&id).await?))
}

pub async fn create_booking_request(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>)> {
    let submission: BookingSubmission = parse_json(&body)?;
    let request = state.bookings.submit(submission).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "id": request.id })),
    ))
}

pub async fn create_checkout_session(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CheckoutRedirect>> {
    let submission: CheckoutSubmission = parse_json(&body)?;
    Ok(Json(state.checkout.initiate(submission).await?))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(checkout_id): Path<String>,
) -> Result<Json<SessionConfirmation>> {
    Ok(Json(state.sessions.resolve_checkout(&checkout_id).await?))
}

pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>> {
    let form: WaitlistForm = parse_json(&body)?;
    state.waitlist.join(form).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Successfully joined the waitlist"
    })))
}

pub async fn not_found() -> MarketError {
    MarketError::NotFound("Not found".to_string())
}
