//! # scribe-db
//!
//! PostgreSQL database layer for scribe.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for notes, users, and sessions
//!
//! ## Example
//!
//! ```rust,ignore
//! use scribe_db::Database;
//! use scribe_core::{CreateNoteRequest, NoteRepository};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/scribe").await?;
//!
//!     let note_id = db.notes.insert(CreateNoteRequest {
//!         id: Uuid::new_v4(),
//!         author_id: some_user_id,
//!     }).await?;
//!
//!     println!("Created note: {}", note_id);
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod pool;
pub mod sessions;

// Re-export core types
pub use scribe_core::*;

// Re-export repository implementations
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use sessions::PgSessionRepository;

/// Bundles the connection pool and all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note repository for CRUD operations.
    pub notes: std::sync::Arc<PgNoteRepository>,
    /// Session and user repository.
    pub sessions: std::sync::Arc<PgSessionRepository>,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: std::sync::Arc::new(PgNoteRepository::new(pool.clone())),
            sessions: std::sync::Arc::new(PgSessionRepository::new(pool.clone())),
            pool,
        }
    }

    /// Connect with default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
