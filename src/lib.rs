//! Minimal CRUD HTTP API over a MySQL `usuarios` table.
//!
//! Each HTTP verb maps to exactly one parameterized SQL statement:
//!
//! ```text
//! GET    /usuarios      SELECT id, nombre, email FROM usuarios
//! POST   /usuarios      INSERT INTO usuarios (nombre, email) VALUES (?, ?)
//! PUT    /usuarios/:id  UPDATE usuarios SET nombre = ?, email = ? WHERE id = ?
//! DELETE /usuarios/:id  DELETE FROM usuarios WHERE id = ?
//! ```
//!
//! The store connection is attempted once at startup. If it fails, every user
//! endpoint answers with an error until the process is restarted.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Repository trait, MySQL adapter and connectivity gate
//! - [`api`]: HTTP handlers and router
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Shutdown and panic helpers

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, AppError, Result, StoreError};
