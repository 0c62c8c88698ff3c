use crate::domain::{models::{tenant::{Plan, Tenant, UNLIMITED_NOTES}, user::User}, ports::TenantRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

const TENANT_COLUMNS: &str = "id, name, slug, plan, note_limit, created_at, updated_at";

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PostgresTenantRepo {
    async fn create_with_admin(&self, tenant: &Tenant, admin: &User) -> Result<(Tenant, User), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created_tenant = sqlx::query_as::<_, Tenant>(&format!(
            "INSERT INTO tenants ({TENANT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {TENANT_COLUMNS}"
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
            "INSERT INTO users (id, tenant_id, email, password_hash, role, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id, tenant_id, email, password_hash, role, created_at, updated_at"
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
        sqlx::query_as::<_, Tenant>(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn upgrade_to_pro(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(&format!(
            "UPDATE tenants SET plan = $1, note_limit = $2, updated_at = $3 WHERE slug = $4 RETURNING {TENANT_COLUMNS}"
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
