use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::services::booking::{self, BookingRequest};
use crate::services::notifier::{self, NotificationKind};
use crate::services::rate_limit;
use crate::state::AppState;

// POST /api/book
pub async fn book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<BookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let client = super::client_key(&headers);

    let appointment = {
        let db = state.db.lock().unwrap();
        if !rate_limit::check_now(&db, "book", &client)? {
            return Err(AppError::RateLimited);
        }
        booking::submit_booking(&db, &req)?
    };

    let id = appointment.id;
    notifier::enqueue(&state.notifier, NotificationKind::Booked, appointment);

    Ok(Json(serde_json::json!({ "success": true, "id": id })))
}
