use std::{future::Future, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::users::model::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },
}

/// Persistence access for the `users` table.
///
/// `get` reports a missing row as `Ok(None)` so callers can tell it apart
/// from a failed query. `update` and `delete` do not check affected rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn get(&self, user_id: i32) -> Result<Option<User>, StoreError>;
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    async fn update(&self, user_id: i32, user: &NewUser) -> Result<(), StoreError>;
    async fn delete(&self, user_id: i32) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
    statement_timeout: Duration,
}

impl PgUserStore {
    /// Opens the pool and waits for the first connection.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.db.max_connections)
            .acquire_timeout(config.db.acquire_timeout())
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        info!(
            max_connections = config.db.max_connections,
            "connected to the database"
        );
        Ok(Self::from_pool(db, config.db.statement_timeout()))
    }

    pub fn from_pool(db: PgPool, statement_timeout: Duration) -> Self {
        Self {
            db,
            statement_timeout,
        }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<T, StoreError> {
        debug!(op, "users store");
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(res) => Ok(res?),
            Err(_) => Err(StoreError::Timeout {
                op,
                after: self.statement_timeout,
            }),
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.bounded(
            "list",
            sqlx::query_as::<_, User>(
                r#"
                SELECT user_id, user_name, first_name, last_name, email, user_status, department
                FROM users
                "#,
            )
            .fetch_all(&self.db),
        )
        .await
    }

    async fn get(&self, user_id: i32) -> Result<Option<User>, StoreError> {
        self.bounded(
            "get",
            sqlx::query_as::<_, User>(
                r#"
                SELECT user_id, user_name, first_name, last_name, email, user_status, department
                FROM users
                WHERE user_id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.db),
        )
        .await
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let user_id = self
            .bounded(
                "insert",
                sqlx::query_scalar::<_, i32>(
                    r#"
                    INSERT INTO users (user_name, first_name, last_name, email, user_status, department)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING user_id
                    "#,
                )
                .bind(&user.user_name)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.email)
                .bind(&user.user_status)
                .bind(&user.department)
                .fetch_one(&self.db),
            )
            .await?;
        Ok(user.with_id(user_id))
    }

    async fn update(&self, user_id: i32, user: &NewUser) -> Result<(), StoreError> {
        self.bounded(
            "update",
            sqlx::query(
                r#"
                UPDATE users
                SET user_name = $1, first_name = $2, last_name = $3,
                    email = $4, user_status = $5, department = $6
                WHERE user_id = $7
                "#,
            )
            .bind(&user.user_name)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.user_status)
            .bind(&user.department)
            .bind(user_id)
            .execute(&self.db),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, user_id: i32) -> Result<(), StoreError> {
        self.bounded(
            "delete",
            sqlx::query("DELETE FROM users WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.db),
        )
        .await?;
        Ok(())
    }
}
