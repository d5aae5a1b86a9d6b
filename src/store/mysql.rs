//! MySQL-backed user repository.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, instrument};

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::metrics::timer_store_query;

use super::repository::UserRepository;
use super::types::{NewUser, Operation, User, UserId};

const SQL_LIST: &str = "SELECT id, nombre, email FROM usuarios";
const SQL_INSERT: &str = "INSERT INTO usuarios (nombre, email) VALUES (?, ?)";
const SQL_UPDATE: &str = "UPDATE usuarios SET nombre = ?, email = ? WHERE id = ?";
const SQL_DELETE: &str = "DELETE FROM usuarios WHERE id = ?";

/// Repository holding the process-wide store connection.
///
/// The pool is capped at one connection with no idle or lifetime expiry, so
/// every query goes over the connection opened at startup.
#[derive(Debug, Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Open the single connection. Fails if the store is unreachable.
    #[instrument(skip(config), fields(db = %config.display_target()))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Option::<Duration>::None)
            .max_lifetime(Option::<Duration>::None)
            .connect_with(config.connect_options())
            .await?;

        debug!("Store connection established");
        Ok(Self { pool })
    }

    /// Close the connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let _timer = timer_store_query(Operation::List);
        let users = sqlx::query_as::<_, User>(SQL_LIST)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    #[instrument(skip(self, user))]
    async fn insert(&self, user: &NewUser) -> Result<User, StoreError> {
        let _timer = timer_store_query(Operation::Create);
        let result = sqlx::query(SQL_INSERT)
            .bind(&user.name)
            .bind(&user.email)
            .execute(&self.pool)
            .await?;

        let id = UserId::try_from(result.last_insert_id()).map_err(|_| {
            StoreError::Backend(format!(
                "generated id {} out of range",
                result.last_insert_id()
            ))
        })?;
        Ok(user.clone().with_id(id))
    }

    #[instrument(skip(self, user))]
    async fn update_by_id(&self, id: UserId, user: &NewUser) -> Result<u64, StoreError> {
        let _timer = timer_store_query(Operation::Update);
        let result = sqlx::query(SQL_UPDATE)
            .bind(&user.name)
            .bind(&user.email)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: UserId) -> Result<u64, StoreError> {
        let _timer = timer_store_query(Operation::Delete);
        let result = sqlx::query(SQL_DELETE).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
