use crate::domain::{models::user::{User, UserChanges}, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::error;

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, tenant_id, email, password_hash, role, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id, tenant_id, email, password_hash, role, created_at, updated_at",
        )
            .bind(&user.id)
            .bind(&user.tenant_id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, tenant_id, email, password_hash, role, created_at, updated_at FROM users WHERE email = ?",
        )
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, tenant_id, email, password_hash, role, created_at, updated_at FROM users WHERE tenant_id = ? AND id = ?",
        )
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, tenant_id, email, password_hash, role, created_at, updated_at FROM users WHERE tenant_id = ? ORDER BY email ASC"
        )
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, tenant_id: &str, id: &str, changes: &UserChanges) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = COALESCE(?, email), role = COALESCE(?, role), password_hash = COALESCE(?, password_hash), updated_at = ?
             WHERE tenant_id = ? AND id = ?
             RETURNING id, tenant_id, email, password_hash, role, created_at, updated_at"
        )
            .bind(&changes.email)
            .bind(changes.role.map(|r| r.as_str()))
            .bind(&changes.password_hash)
            .bind(Utc::now())
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("SQLite User Deletion Failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
