use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{into_payload, LoginRequest, SignupRequest},
    responses::{LoginResponse, OrganizationSummary, SignupResponse, UserProfile},
};
use crate::domain::models::{auth::Principal, tenant::Tenant, user::{normalize_email, Role, User}};
use crate::domain::services::credentials::{hash_password, verify_credentials};
use crate::domain::services::validation::{validate_email, validate_password, validate_slug};
use crate::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Registers a new organization on the free plan together with its first admin,
/// and signs that admin in.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = into_payload(payload)?;
    let (Some(name), Some(slug), Some(email), Some(password)) = (
        required(&payload.organization_name),
        payload.organization_slug.as_deref().filter(|s| !s.is_empty()),
        required(&payload.admin_email),
        payload.admin_password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Organization name, slug, admin email, and password are required".into(),
        ));
    };

    validate_email(email)?;
    validate_password(password)?;
    validate_slug(slug)?;

    let email = normalize_email(email);

    if state.tenant_repo.find_by_slug(slug).await?.is_some() {
        return Err(AppError::Conflict("Organization slug is already taken".into()));
    }
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".into()));
    }

    let password_hash = hash_password(password)?;
    let tenant = Tenant::new(name.to_string(), slug.to_string(), state.config.free_plan_note_limit);
    let admin = User::new(tenant.id.clone(), &email, password_hash, Role::Admin);

    let (tenant, admin) = state.tenant_repo
        .create_with_admin(&tenant, &admin)
        .await
        .map_err(|e| e.on_unique_violation("Organization slug or email is already registered"))?;

    info!("Organization registered: {} ({})", tenant.slug, tenant.id);

    let token = state.token_service.issue(&Principal::for_user(&admin, &tenant))?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Organization registered successfully".into(),
            token,
            user: UserProfile::new(&admin, &tenant),
            organization: OrganizationSummary::from(&tenant),
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = into_payload(payload)?;
    let (Some(email), Some(password)) = (
        required(&payload.email),
        payload.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };

    let user = verify_credentials(state.user_repo.as_ref(), email, password).await?;

    let tenant = state.tenant_repo.find_by_id(&user.tenant_id).await?.ok_or_else(|| {
        warn!("User {} references missing tenant {}", user.id, user.tenant_id);
        AppError::InternalWithMsg(format!("Tenant {} not found for user {}", user.tenant_id, user.id))
    })?;

    let token = state.token_service.issue(&Principal::for_user(&user, &tenant))?;

    info!("User logged in: {}", user.id);

    Ok(Json(LoginResponse {
        token,
        user: UserProfile::new(&user, &tenant),
    }))
}
