use axum::{extract::{rejection::JsonRejection, Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{into_payload, NoteRequest};
use crate::api::extractors::auth::Caller;
use crate::domain::models::{auth::Principal, note::Note};
use crate::domain::services::policy::{enforce, Action, Resource};
use crate::domain::services::quota::ensure_note_quota;
use crate::domain::services::validation::validate_note;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Loads a note from the caller's tenant and checks `action` against it.
/// A note that exists but belongs to someone else is reported as missing.
async fn load_note(
    state: &AppState,
    principal: &Principal,
    action: Action,
    id: &str,
) -> Result<Note, AppError> {
    let note = state.note_repo
        .find_by_id(&principal.tenant_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Note not found".into()))?;

    enforce(Some(principal), action, Resource::record(&note.tenant_id, &note.user_id))?;
    Ok(note)
}

pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    caller: Caller,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::ListNotes, Resource::own_tenant())?;

    let notes = state.note_repo.list_by_owner(&principal.tenant_id, &principal.user_id).await?;

    Ok(Json(json!({ "notes": notes })))
}

pub async fn create_note(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::CreateNote, Resource::own_tenant())?;
    let payload = into_payload(payload)?;
    let changes = validate_note(payload.title.as_deref(), payload.content.as_deref())?;

    // A token outlives the account it was issued for.
    if state.user_repo.find_by_id(&principal.tenant_id, &principal.user_id).await?.is_none() {
        debug!("Token for deleted user {} used to create a note", principal.user_id);
        return Err(AppError::Unauthorized);
    }

    let tenant = state.tenant_repo.find_by_id(&principal.tenant_id).await?
        .ok_or_else(|| AppError::InternalWithMsg(format!("Tenant {} missing for verified token", principal.tenant_id)))?;

    ensure_note_quota(&tenant, principal, state.note_repo.as_ref()).await?;

    let note = Note::new(principal.tenant_id.clone(), principal.user_id.clone(), changes.title, changes.content);
    let created = state.note_repo.create(&note).await?;

    info!("Note created: {}", created.id);

    Ok((StatusCode::CREATED, Json(json!({ "note": created }))))
}

pub async fn get_note(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::ReadNote, Resource::own_tenant())?;
    let note = load_note(&state, principal, Action::ReadNote, &id).await?;

    Ok(Json(json!({ "note": note })))
}

pub async fn update_note(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::UpdateNote, Resource::own_tenant())?;
    let payload = into_payload(payload)?;
    let changes = validate_note(payload.title.as_deref(), payload.content.as_deref())?;

    let note = load_note(&state, principal, Action::UpdateNote, &id).await?;

    let updated = state.note_repo
        .update(&note.tenant_id, &note.user_id, &note.id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Note not found".into()))?;

    info!("Note updated: {}", updated.id);

    Ok(Json(json!({ "note": updated })))
}

pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let principal = enforce(caller.principal(), Action::DeleteNote, Resource::own_tenant())?;
    let note = load_note(&state, principal, Action::DeleteNote, &id).await?;

    if !state.note_repo.delete(&note.tenant_id, &note.user_id, &note.id).await? {
        return Err(AppError::NotFound("Note not found".into()));
    }

    info!("Note deleted: {}", note.id);

    Ok(Json(json!({ "message": "Note deleted successfully" })))
}
