//! Store module for the `usuarios` table.
//!
//! This module handles:
//! - User record types
//! - The repository trait and its MySQL implementation
//! - The connectivity gate decided once at startup
//! - An in-memory repository for testing

pub mod memory;
pub mod mysql;
pub mod repository;
pub mod types;

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::DatabaseConfig;
use crate::error::ApiError;

pub use memory::{MemoryConfig, MemoryUserRepository};
pub use mysql::MySqlUserRepository;
pub use repository::UserRepository;
pub use types::{NewUser, Operation, User, UserId, UserPayload};

/// Outcome of the startup connection attempt.
///
/// Decided once by [`Store::connect`] and never re-evaluated: a failed
/// attempt keeps every user operation disabled until the process restarts.
#[derive(Clone)]
pub enum Store {
    /// The startup connection succeeded.
    Connected(Arc<dyn UserRepository>),
    /// The startup connection failed.
    Unavailable,
}

impl Store {
    /// Make the single startup connection attempt.
    ///
    /// A failure is logged and yields [`Store::Unavailable`]; it never aborts
    /// the process.
    pub async fn connect(config: &DatabaseConfig) -> Self {
        match MySqlUserRepository::connect(config).await {
            Ok(repo) => {
                info!(target_db = %config.display_target(), "Connected to MySQL store");
                Self::from_repository(repo)
            }
            Err(e) => {
                error!(
                    target_db = %config.display_target(),
                    "Failed to connect to MySQL store: {}", e
                );
                Self::Unavailable
            }
        }
    }

    /// Gate open over the given repository.
    pub fn from_repository(repo: impl UserRepository + 'static) -> Self {
        Self::Connected(Arc::new(repo))
    }

    /// Whether the gate is open.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// The repository, or [`ApiError::ServiceUnavailable`] if the gate is closed.
    pub fn repository(&self) -> Result<&dyn UserRepository, ApiError> {
        match self {
            Self::Connected(repo) => Ok(repo.as_ref()),
            Self::Unavailable => Err(ApiError::ServiceUnavailable),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected(_) => f.write_str("Store::Connected"),
            Self::Unavailable => f.write_str("Store::Unavailable"),
        }
    }
}
