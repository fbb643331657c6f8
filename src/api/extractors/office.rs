use axum::{
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
};
use std::collections::HashMap;
use crate::domain::models::office::Office;

/// The `{office}` path segment, resolved to a known office.
pub struct OfficeParam(pub Office);

impl<S> FromRequestParts<S> for OfficeParam
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| StatusCode::BAD_REQUEST)?;

        let raw = params.get("office").ok_or(StatusCode::BAD_REQUEST)?;

        raw.parse::<Office>()
            .map(OfficeParam)
            .map_err(|_| StatusCode::NOT_FOUND)
    }
}
