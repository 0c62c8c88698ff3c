use axum::{extract::{rejection::JsonRejection, Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{into_payload, InviteUserRequest, UpdateUserRequest};
use crate::api::extractors::auth::Caller;
use crate::domain::models::user::{normalize_email, Role, User, UserChanges};
use crate::domain::services::credentials::hash_password;
use crate::domain::services::policy::{enforce, Action, Resource};
use crate::domain::services::validation::{parse_role, validate_email, validate_password};
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

const EMAIL_TAKEN: &str = "User with this email already exists";

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::ListUsers, Resource::own_tenant())?;

    let users = state.user_repo.list_by_tenant(&principal.tenant_id).await?;

    Ok(Json(json!({ "users": users })))
}

/// Creates a user directly inside the admin's tenant. Role defaults to member.
pub async fn invite_user(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    payload: Result<Json<InviteUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::InviteUser, Resource::own_tenant())?;
    let payload = into_payload(payload)?;

    let (Some(email), Some(password)) = (
        payload.email.as_deref().map(str::trim).filter(|e| !e.is_empty()),
        payload.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };

    validate_email(email)?;
    validate_password(password)?;
    let role = match payload.role.as_deref() {
        Some(role) => parse_role(role)?,
        None => Role::Member,
    };

    let email = normalize_email(email);
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(EMAIL_TAKEN.into()));
    }

    let user = User::new(principal.tenant_id.clone(), &email, hash_password(password)?, role);
    let created = state.user_repo
        .create(&user)
        .await
        .map_err(|e| e.on_unique_violation(EMAIL_TAKEN))?;

    info!("User {} invited to tenant {} as {}", created.id, created.tenant_id, created.role);

    Ok((StatusCode::CREATED, Json(json!({ "user": created }))))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::ReadUser, Resource::own_tenant())?;

    let user = state.user_repo.find_by_id(&principal.tenant_id, &id).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    enforce(Some(principal), Action::ReadUser, Resource::record(&user.tenant_id, &user.id))?;

    Ok(Json(json!({ "user": user })))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::UpdateUser, Resource::user_target(&id))?;
    let payload = into_payload(payload)?;

    // Empty strings count as "not provided".
    let provided = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

    let mut changes = UserChanges::default();
    if let Some(email) = provided(&payload.email).as_deref() {
        validate_email(email)?;
        changes.email = Some(normalize_email(email));
    }
    if let Some(role) = provided(&payload.role).as_deref() {
        changes.role = Some(parse_role(role)?);
    }
    if let Some(password) = provided(&payload.password).as_deref() {
        validate_password(password)?;
        changes.password_hash = Some(hash_password(password)?);
    }

    let updated = state.user_repo
        .update(&principal.tenant_id, &id, &changes)
        .await
        .map_err(|e| e.on_unique_violation(EMAIL_TAKEN))?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!("User updated: {}", updated.id);

    Ok(Json(json!({ "user": updated })))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::DeleteUser, Resource::user_target(&id))?;

    let user = state.user_repo.find_by_id(&principal.tenant_id, &id).await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    enforce(Some(principal), Action::DeleteUser, Resource::record(&user.tenant_id, &user.id))?;

    if !state.user_repo.delete(&user.tenant_id, &user.id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    info!("User {} deleted by {}", user.id, principal.user_id);

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
