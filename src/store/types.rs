//! User record types shared by the HTTP layer and repositories.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Store-assigned user identifier.
pub type UserId = i64;

/// A persisted row of the `usuarios` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Primary key, assigned on insert.
    pub id: UserId,
    /// Display name, column `nombre`.
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub name: String,
    /// Contact email. Not checked for format or uniqueness.
    pub email: String,
}

/// Validated field values for an insert or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Value for `nombre`.
    pub name: String,
    /// Value for `email`.
    pub email: String,
}

impl NewUser {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Request body for create and update, before presence checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    /// Requested `nombre`.
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    /// Requested `email`.
    #[serde(default)]
    pub email: Option<String>,
}

impl UserPayload {
    /// Both fields present and non-empty, or `None`.
    pub fn into_new_user(self) -> Option<NewUser> {
        match (self.name, self.email) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Some(NewUser { name, email })
            }
            _ => None,
        }
    }
}

/// User operations, used as log and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    /// `GET /usuarios`.
    List,
    /// `POST /usuarios`.
    Create,
    /// `PUT /usuarios/:id`.
    Update,
    /// `DELETE /usuarios/:id`.
    Delete,
}
