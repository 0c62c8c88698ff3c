use std::sync::Arc;
use std::time::Instant;
use crate::domain::ports::{NoteRepository, TenantRepository, UserRepository};
use crate::domain::services::token_service::TokenService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub note_repo: Arc<dyn NoteRepository>,
    pub token_service: Arc<TokenService>,
    pub started_at: Instant,
}
