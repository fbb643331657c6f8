use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::requests::LoginRequest;
use crate::domain::models::auth::AuthResponse;
use crate::domain::services::auth_service::{SESSION_COOKIE, SESSION_HOURS};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use tracing::{info, warn};

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(e) = state.auth_service.verify_credentials(&payload.username, &payload.password) {
        warn!("Failed admin login for '{}'", payload.username);
        return Err(e);
    }

    let (session_token, csrf_token) = state.auth_service.issue_session()?;

    let mut session = Cookie::new(SESSION_COOKIE, session_token);
    session.set_http_only(true);
    session.set_secure(true);
    session.set_same_site(SameSite::Strict);
    session.set_path("/");
    session.set_max_age(Duration::hours(SESSION_HOURS));
    cookies.add(session);

    info!("Admin logged in: {}", payload.username);

    Ok(Json(AuthResponse {
        csrf_token,
        username: payload.username,
    }))
}

pub async fn logout(cookies: Cookies) -> Result<impl IntoResponse, AppError> {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());

    info!("Admin logged out");

    Ok(StatusCode::OK)
}
