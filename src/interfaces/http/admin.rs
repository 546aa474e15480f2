use super::AppState;
use super::identity::{Admin, Caller};
use crate::domain::booking::{BookingRequest, BookingRequestWithProfessional, StatusChange};
use crate::domain::profile::{NewProfile, ProfessionalProfile, ProfileUpdate};
use crate::domain::session::{Session, SessionChange, SessionStatusForm, SessionWithProfessional};
use crate::domain::validation::parse_json;
use crate::domain::waitlist::WaitlistSignup;
use crate::error::Result;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

pub async fn check(State(state): State<Arc<AppState>>, Caller(email): Caller) -> Json<Value> {
    Json(json!({ "is_admin": state.admins.is_admin(email.as_deref()) }))
}

pub async fn list_profiles(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
) -> Result<Json<Vec<ProfessionalProfile>>> {
    Ok(Json(state.directory.list_all().await?))
}

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    body: Bytes,
) -> Result<Json<ProfessionalProfile>> {
    let new: NewProfile = parse_json(&body)?;
    let profile = state.directory.create(new).await?;
    info!(%admin, profile_id = %profile.id, "Admin created profile");
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ProfessionalProfile>> {
    let update: ProfileUpdate = parse_json(&body)?;
    let profile = state.directory.update(&id, update).await?;
    info!(%admin, profile_id = %id, "Admin updated profile");
    Ok(Json(profile))
}

pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Admin(admin): Admin,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.directory.delete(&id).await?;
    info!(%admin, profile_id = %id, "Admin deleted profile");
    Ok(Json(json!({ "success": true })))
}

pub async fn list_booking_requests(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
) -> Result<Json<Vec<BookingRequestWithProfessional>>> {
    Ok(Json(state.bookings.list_all().await?))
}

pub async fn update_booking_request(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<BookingRequest>> {
    let change: StatusChange = parse_json(&body)?;
    Ok(Json(state.bookings.update_status(&id, change).await?))
}

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
) -> Result<Json<Vec<SessionWithProfessional>>> {
    Ok(Json(state.sessions.list_all().await?))
}

pub async fn update_session(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Session>> {
    let form: SessionStatusForm = parse_json(&body)?;
    let change = SessionChange::try_from(form)?;
    Ok(Json(state.sessions.update_status(&id, change).await?))
}

pub async fn list_waitlist(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
) -> Result<Json<Vec<WaitlistSignup>>> {
    Ok(Json(state.waitlist.list_all().await?))
}
