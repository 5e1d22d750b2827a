use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::AppointmentStatus;
use crate::services::auth::AdminAuth;
use crate::services::notifier::{self, NotificationKind};
use crate::state::AppState;

#[derive(Serialize)]
pub struct AppointmentResponse {
    id: i64,
    name: String,
    email: String,
    phone: String,
    service: String,
    date: String,
    time: String,
    status: String,
    created_at: String,
}

// GET /api/appointments
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    AdminAuth(_admin): AdminAuth,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let appointments = {
        let db = state.db.lock().unwrap();
        queries::list_appointments(&db)?
    };

    let response: Vec<AppointmentResponse> = appointments
        .into_iter()
        .map(|a| AppointmentResponse {
            id: a.id,
            name: a.name,
            email: a.email,
            phone: a.phone,
            service: a.service,
            date: a.date,
            time: a.time,
            status: a.status.as_str().to_string(),
            created_at: a.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct IdRequest {
    pub id: i64,
}

/// Sets the status unconditionally: confirm and reject are last-writer-wins,
/// there is only one administrator identity.
fn set_status(
    state: &AppState,
    id: i64,
    status: AppointmentStatus,
    kind: NotificationKind,
) -> Result<(), AppError> {
    let mut appointment = {
        let db = state.db.lock().unwrap();
        let appointment = queries::get_appointment(&db, id)?.ok_or(AppError::NotFound)?;
        queries::set_appointment_status(&db, id, status)?;
        appointment
    };

    tracing::info!(id, email = %appointment.email, status = status.as_str(), "appointment status updated");

    appointment.status = status;
    notifier::enqueue(&state.notifier, kind, appointment);
    Ok(())
}

// POST /api/confirm
pub async fn confirm_appointment(
    State(state): State<Arc<AppState>>,
    AdminAuth(_admin): AdminAuth,
    Json(req): Json<IdRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    set_status(
        &state,
        req.id,
        AppointmentStatus::Confirmed,
        NotificationKind::Confirmed,
    )?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// POST /api/reject
pub async fn reject_appointment(
    State(state): State<Arc<AppState>>,
    AdminAuth(_admin): AdminAuth,
    Json(req): Json<IdRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    set_status(
        &state,
        req.id,
        AppointmentStatus::Rejected,
        NotificationKind::Rejected,
    )?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    AdminAuth(_admin): AdminAuth,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let appointment = {
        let db = state.db.lock().unwrap();
        let appointment = queries::get_appointment(&db, id)?.ok_or(AppError::NotFound)?;
        queries::delete_appointment(&db, id)?;
        appointment
    };

    tracing::info!(id, email = %appointment.email, "appointment deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Appointment deleted successfully"
    })))
}
