//! Repository abstraction over the `usuarios` table.

use async_trait::async_trait;

use crate::error::StoreError;

use super::types::{NewUser, User, UserId};

/// Data access for users. Each method maps to exactly one SQL statement.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All rows, unfiltered and unordered.
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    /// Insert one row and return it with its generated id.
    async fn insert(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Overwrite `nombre` and `email` of row `id`. Returns affected rows.
    async fn update_by_id(&self, id: UserId, user: &NewUser) -> Result<u64, StoreError>;

    /// Remove row `id`. Returns affected rows.
    async fn delete_by_id(&self, id: UserId) -> Result<u64, StoreError>;
}
