//! Session and user repository implementation.
//!
//! Sessions are bearer tokens: the raw token is handed to the client once at
//! creation and only its SHA-256 hash is stored. Resolution joins the session
//! row to its user and checks expiry; there is no caching, every request hits
//! the store.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use scribe_core::defaults::{SESSION_TOKEN_PREFIX, SESSION_TOKEN_SECRET_LEN};
use scribe_core::{Error, Result, SessionStore, User};

/// PostgreSQL implementation of SessionStore.
pub struct PgSessionRepository {
    pool: Pool<Postgres>,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Generate a random alphanumeric secret.
    fn generate_secret(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Hash a secret using SHA256.
    fn hash_secret(secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Create a user record. Used by provisioning and tests; the login form
    /// does not yet issue credentials.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO app_user (id, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(User {
            id,
            email: email.to_string(),
            created_at: now,
        })
    }
}

#[async_trait]
impl SessionStore for PgSessionRepository {
    async fn resolve(&self, token: &str) -> Result<Option<User>> {
        let hash = Self::hash_secret(token);
        let now = Utc::now();

        let row = sqlx::query(
            r#"SELECT s.id AS session_id, u.id, u.email, u.created_at
            FROM session s
            JOIN app_user u ON u.id = s.user_id
            WHERE s.token_hash = $1
              AND s.expires_at > $2"#,
        )
        .bind(&hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        if let Some(r) = &row {
            let session_id: Uuid = r.get("session_id");
            sqlx::query("UPDATE session SET last_used_at = $1 WHERE id = $2")
                .bind(now)
                .bind(session_id)
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;
        }

        Ok(row.map(|r| User {
            id: r.get("id"),
            email: r.get("email"),
            created_at: r.get("created_at"),
        }))
    }

    async fn create_session(&self, user_id: Uuid, ttl: Duration) -> Result<String> {
        let token = format!(
            "{}{}",
            SESSION_TOKEN_PREFIX,
            Self::generate_secret(SESSION_TOKEN_SECRET_LEN)
        );
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO session (id, user_id, token_hash, expires_at, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(Self::hash_secret(&token))
        .bind(now + ttl)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        // Only shown once; the store keeps the hash.
        Ok(token)
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM session WHERE token_hash = $1")
            .bind(Self::hash_secret(token))
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_secret_length_and_charset() {
        let secret = PgSessionRepository::generate_secret(40);
        assert_eq!(secret.len(), 40);
        assert!(secret.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_hash_secret_is_stable_hex() {
        let a = PgSessionRepository::hash_secret("scrb_sess_abc");
        let b = PgSessionRepository::hash_secret("scrb_sess_abc");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_secret_differs_per_token() {
        let a = PgSessionRepository::hash_secret("token-a");
        let b = PgSessionRepository::hash_secret("token-b");
        assert_ne!(a, b);
    }
}
