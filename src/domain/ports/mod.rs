use crate::domain::models::{
    note::{Note, NoteChanges},
    tenant::Tenant,
    user::{User, UserChanges},
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Persists a tenant together with its first admin in one transaction.
    async fn create_with_admin(&self, tenant: &Tenant, admin: &User) -> Result<(Tenant, User), AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
    async fn upgrade_to_pro(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<User>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<User>, AppError>;
    async fn update(&self, tenant_id: &str, id: &str, changes: &UserChanges) -> Result<Option<User>, AppError>;
    async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn create(&self, note: &Note) -> Result<Note, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Note>, AppError>;
    async fn list_by_owner(&self, tenant_id: &str, user_id: &str) -> Result<Vec<Note>, AppError>;
    async fn count_by_owner(&self, tenant_id: &str, user_id: &str) -> Result<i64, AppError>;
    async fn update(&self, tenant_id: &str, user_id: &str, id: &str, changes: &NoteChanges) -> Result<Option<Note>, AppError>;
    async fn delete(&self, tenant_id: &str, user_id: &str, id: &str) -> Result<bool, AppError>;
}
