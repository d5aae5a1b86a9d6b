//! In-memory user repository for unit testing.
//!
//! Behaves like the MySQL table: ids start at 1, increase monotonically and
//! are never reused after a delete. It also counts calls and can be told to
//! fail, so tests can check that a handler did or did not reach the store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::StoreError;

use super::repository::UserRepository;
use super::types::{NewUser, User, UserId};

/// Configuration for in-memory repository behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    /// When set, every call fails with this message.
    pub fail_with: Option<String>,
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<UserId, User>,
    last_id: UserId,
}

/// In-memory stand-in for the `usuarios` table.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    config: MemoryConfig,
    table: Arc<Mutex<Table>>,
    calls: Arc<AtomicUsize>,
}

impl MemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with custom behavior.
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Repository whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MemoryConfig {
            fail_with: Some(message.into()),
        })
    }

    /// Number of repository calls made so far, across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.table().rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        // Every write is a single map operation, so poisoning is ignored.
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.config.fail_with {
            Some(msg) => Err(StoreError::Backend(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        self.enter()?;
        Ok(self.table().rows.values().cloned().collect())
    }

    async fn insert(&self, user: &NewUser) -> Result<User, StoreError> {
        self.enter()?;
        let mut table = self.table();
        table.last_id += 1;
        let created = user.clone().with_id(table.last_id);
        table.rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_by_id(&self, id: UserId, user: &NewUser) -> Result<u64, StoreError> {
        self.enter()?;
        match self.table().rows.get_mut(&id) {
            Some(row) => {
                row.name = user.name.clone();
                row.email = user.email.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: UserId) -> Result<u64, StoreError> {
        self.enter()?;
        Ok(u64::from(self.table().rows.remove(&id).is_some()))
    }
}
