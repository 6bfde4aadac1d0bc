//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use scribe_core::{CreateNoteRequest, Error, ListNotesResponse, Note, NoteRepository, Result};

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: sqlx::postgres::PgRow) -> Note {
    Note {
        id: row.get("id"),
        author_id: row.get("author_id"),
        text: row.get("text"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Uuid> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO note (id, author_id, text, created_at, updated_at)
             VALUES ($1, $2, '', $3, $3)",
        )
        .bind(req.id)
        .bind(req.author_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(req.id)
    }

    async fn fetch(&self, id: Uuid) -> Result<Note> {
        let row = sqlx::query(
            "SELECT id, author_id, text, created_at, updated_at FROM note WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_row_to_note).ok_or(Error::NoteNotFound(id))
    }

    async fn update_text(&self, id: Uuid, author_id: Uuid, text: &str) -> Result<()> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE note SET text = $1, updated_at = $2 WHERE id = $3 AND author_id = $4",
        )
        .bind(text)
        .bind(now)
        .bind(id)
        .bind(author_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        // Zero rows matched means the id does not exist or belongs to someone
        // else; both look the same to the caller.
        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid, author_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn list_for_author(&self, author_id: Uuid) -> Result<ListNotesResponse> {
        let rows = sqlx::query(
            "SELECT id, author_id, text, created_at, updated_at
             FROM note
             WHERE author_id = $1
             ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let notes: Vec<Note> = rows.into_iter().map(map_row_to_note).collect();
        let total = notes.len() as i64;
        Ok(ListNotesResponse { notes, total })
    }

    async fn texts_for_author(&self, author_id: Uuid) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT text FROM note WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(|r| r.get("text")).collect())
    }
}
