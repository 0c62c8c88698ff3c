use axum::{extract::rejection::JsonRejection, Json};
use serde::Deserialize;
use crate::error::AppError;

/// Unwraps a JSON body taken as `Result<Json<T>, JsonRejection>`. Handlers
/// call this after the policy check so an anonymous request gets a 401 no
/// matter what its body looks like.
pub fn into_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

// Fields are optional so that a missing field is reported as a 400 with a
// readable message instead of a JSON rejection.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub organization_name: Option<String>,
    pub organization_slug: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct NoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct InviteUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}
