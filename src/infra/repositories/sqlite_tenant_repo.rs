use crate::domain::{models::{tenant::{Plan, Tenant, UNLIMITED_NOTES}, user::User}, ports::TenantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const TENANT_COLUMNS: &str = "id, name, slug, plan, note_limit, created_at, updated_at";

pub struct SqliteTenantRepo {
    pool: SqlitePool,
}

impl SqliteTenantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for SqliteTenantRepo {
    async fn create_with_admin(&self, tenant: &Tenant, admin: &User) -> Result<(Tenant, User), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created_tenant = sqlx::query_as::<_, Tenant>(&format!(
            "INSERT INTO tenants ({TENANT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING {TENANT_COLUMNS}"
        ))
            .bind(&tenant.id)
            .bind(&tenant.name)
            .bind(&tenant.slug)
            .bind(tenant.plan.as_str())
            .bind(tenant.note_limit)
            .bind(tenant.created_at)
            .bind(tenant.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let created_admin = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, tenant_id, email, password_hash, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, tenant_id, email, password_hash, role, created_at, updated_at"
        )
            .bind(&admin.id)
            .bind(&created_tenant.id)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(admin.role.as_str())
            .bind(admin.created_at)
            .bind(admin.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok((created_tenant, created_admin))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upgrade_to_pro(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(&format!(
            "UPDATE tenants SET plan = ?, note_limit = ?, updated_at = ? WHERE slug = ? RETURNING {TENANT_COLUMNS}"
        ))
            .bind(Plan::Pro.as_str())
            .bind(UNLIMITED_NOTES)
            .bind(Utc::now())
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tenants")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
