use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;

/// Refresh-token store backed by Postgres.
///
/// The signed token string is the primary key; rotation runs delete and
/// insert in one transaction so a token can be rotated at most once.
pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn insert(&self, token: &str, user_id: &UserId) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(token)
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, SessionError> {
        let row = sqlx::query(
            r#"
            SELECT token, user_id
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

        Ok(row.map(|r| RefreshTokenRecord {
            token: r.get("token"),
            user_id: UserId(r.get("user_id")),
        }))
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn rotate(
        &self,
        old_token: &str,
        new_token: &str,
        user_id: &UserId,
    ) -> Result<bool, SessionError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| SessionError::Persistence(e.to_string()))?;

        // The delete is conditional on the old row still existing; the second
        // of two concurrent rotations finds nothing to delete and loses.
        let deleted = sqlx::query(
            r#"
            DELETE FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(old_token)
        .execute(&mut *tx)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

        if deleted.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| SessionError::Persistence(e.to_string()))?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(new_token)
        .bind(user_id.0)
        .execute(&mut *tx)
        .await
        .map_err(|e| SessionError::Persistence(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| SessionError::Persistence(e.to_string()))?;

        Ok(true)
    }
}
