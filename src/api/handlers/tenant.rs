use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::Caller;
use crate::domain::services::policy::{enforce, Action, Resource};
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub async fn get_tenant(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    enforce(caller.principal(), Action::ReadTenant, Resource::tenant_slug(&slug))?;

    let tenant = state.tenant_repo.find_by_slug(&slug).await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".into()))?;

    Ok(Json(json!({ "tenant": tenant })))
}

/// Moves the caller's own tenant to the pro plan. Takes effect on the next
/// note creation; outstanding tokens stay valid.
pub async fn upgrade_tenant(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::UpgradeTenant, Resource::tenant_slug(&slug))?;

    let tenant = state.tenant_repo.upgrade_to_pro(&slug).await?
        .ok_or_else(|| AppError::NotFound("Tenant not found".into()))?;

    info!("Tenant {} upgraded to pro by {}", tenant.slug, principal.user_id);

    Ok(Json(json!({
        "message": "Tenant upgraded to Pro successfully",
        "tenant": tenant
    })))
}
