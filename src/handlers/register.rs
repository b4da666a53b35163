use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::ALLOW, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{RegistrationError, MSG_CREATED};
use crate::models::{AppState, RegisterBody, RegistrationRequest};

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// `POST /api/register/:role` or `POST /api/register?role=<role>` with a JSON
/// `{username, password}` body.
///
/// The path segment wins over the query. With neither, the request fails
/// validation like any unknown role.
pub async fn register_post(
    State(state): State<AppState>,
    role: Option<Path<String>>,
    query: Option<Query<RoleQuery>>,
    body: Bytes,
) -> Response {
    let role = role
        .map(|Path(r)| r)
        .or_else(|| query.and_then(|Query(q)| q.role));
    let body = RegisterBody::from_bytes(&body);

    let request = match RegistrationRequest::from_body(role.as_deref(), &body) {
        Ok(r) => r,
        Err(e) => return e.into_response(),
    };

    match state.registration.register(request).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "message": MSG_CREATED }))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Any verb other than POST on the registration routes.
pub async fn method_not_allowed() -> Response {
    ([(ALLOW, "POST")], RegistrationError::MethodNotAllowed.into_response()).into_response()
}
