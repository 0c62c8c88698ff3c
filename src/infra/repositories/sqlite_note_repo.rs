use crate::domain::{models::note::{Note, NoteChanges}, ports::NoteRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteNoteRepo {
    pool: SqlitePool,
}

impl SqliteNoteRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepo {
    async fn create(&self, note: &Note) -> Result<Note, AppError> {
        sqlx::query_as::<_, Note>(
            "INSERT INTO notes (id, tenant_id, user_id, title, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&note.id)
            .bind(&note.tenant_id)
            .bind(&note.user_id)
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.created_at)
            .bind(note.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Note>, AppError> {
        sqlx::query_as::<_, Note>("SELECT * FROM notes WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_owner(&self, tenant_id: &str, user_id: &str) -> Result<Vec<Note>, AppError> {
        sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE tenant_id = ? AND user_id = ? ORDER BY created_at DESC, id DESC"
        )
            .bind(tenant_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_owner(&self, tenant_id: &str, user_id: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notes WHERE tenant_id = ? AND user_id = ?")
            .bind(tenant_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, tenant_id: &str, user_id: &str, id: &str, changes: &NoteChanges) -> Result<Option<Note>, AppError> {
        sqlx::query_as::<_, Note>(
            "UPDATE notes SET title = ?, content = ?, updated_at = ? WHERE tenant_id = ? AND user_id = ? AND id = ? RETURNING *"
        )
            .bind(&changes.title)
            .bind(&changes.content)
            .bind(Utc::now())
            .bind(tenant_id)
            .bind(user_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, tenant_id: &str, user_id: &str, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM notes WHERE tenant_id = ? AND user_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
