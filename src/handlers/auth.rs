use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::rate_limit;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// POST /admin-login
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let client = super::client_key(&headers);
    {
        let db = state.db.lock().unwrap();
        if !rate_limit::check_now(&db, "login", &client)? {
            return Err(AppError::RateLimited);
        }
    }

    let token = state.gate.login(&req.username, &req.password)?;
    Ok(Json(serde_json::json!({ "success": true, "token": token })))
}
