use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
};
use crate::state::AppState;
use crate::domain::services::auth_service::SESSION_COOKIE;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

/// Whether the request carries a valid admin session. Never rejects.
pub struct MaybeAdmin(pub bool);

impl<S> FromRequestParts<S> for MaybeAdmin
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAdmin(false));
        };

        let Some(cookie) = cookies.get(SESSION_COOKIE) else {
            return Ok(MaybeAdmin(false));
        };

        match app_state.auth_service.decode_session(cookie.value()) {
            Ok(_) => Ok(MaybeAdmin(true)),
            Err(_) => {
                // expired or tampered session: treat as a customer
                debug!("MaybeAdmin: ignoring invalid session cookie");
                Ok(MaybeAdmin(false))
            }
        }
    }
}
