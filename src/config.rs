//! Application configuration loaded from environment variables.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

use crate::error::AppError;

/// Connection settings for the MySQL store, read from `DB_*` variables.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Store host name (`DB_HOST`).
    #[serde(default = "default_db_host")]
    pub host: String,

    /// Store TCP port (`DB_PORT`).
    #[serde(default = "default_db_port")]
    pub port: u16,

    /// Login user (`DB_USER`).
    #[serde(default = "default_db_user")]
    pub user: String,

    /// Login password (`DB_PASSWORD`), empty when unset.
    #[serde(default)]
    pub password: String,

    /// Schema holding the `usuarios` table (`DB_DATABASE`).
    #[serde(default = "default_db_database")]
    pub database: String,

    /// Upper bound on the startup connection attempt (`DB_CONNECT_TIMEOUT_SECS`).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Store connection settings.
    pub database: DatabaseConfig,
    /// Listener settings.
    pub server: ServerConfig,
}

/// HTTP listener settings, read from unprefixed variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    3306
}

fn default_db_user() -> String {
    "root".to_string()
}

fn default_db_database() -> String {
    "miapi".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_port() -> u16 {
    3000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            database: default_db_database(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("database", &self.database)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    /// Driver options for this store. Built field by field, so the password
    /// needs no URL escaping.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }

    /// Startup connection timeout.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// `user@host:port/database`, for logs.
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Ok(Self {
            database: envy::prefixed("DB_").from_env()?,
            server: envy::from_env()?,
        })
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.database.host.trim().is_empty() {
            return Err("DB_HOST must not be empty".to_string());
        }

        if self.database.database.trim().is_empty() {
            return Err("DB_DATABASE must not be empty".to_string());
        }

        if self.database.port == 0 {
            return Err("DB_PORT must be greater than 0".to_string());
        }

        if self.database.connect_timeout_secs == 0 {
            return Err("DB_CONNECT_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_match_legacy_server() {
        let config = Config::default();
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.user, "root");
        assert_eq!(config.database.password, "");
        assert_eq!(config.database.database, "miapi");
        assert_eq!(config.database.connect_timeout_secs, 10);
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn envy_reads_prefixed_store_settings() {
        let vars = vec![
            ("DB_HOST".to_string(), "db.internal".to_string()),
            ("DB_PORT".to_string(), "3307".to_string()),
            ("DB_PASSWORD".to_string(), "s3cret".to_string()),
        ];
        let db: DatabaseConfig = envy::prefixed("DB_").from_iter(vars).unwrap();

        assert_eq!(db.host, "db.internal");
        assert_eq!(db.port, 3307);
        assert_eq!(db.user, "root");
        assert_eq!(db.password, "s3cret");
        assert_eq!(db.database, "miapi");
    }

    #[test]
    fn validate_rejects_empty_host() {
        let mut config = Config::default();
        config.database.host = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_database() {
        let mut config = Config::default();
        config.database.database = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_hides_password() {
        let db = DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        };
        let rendered = format!("{:?}", db);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn display_target_omits_password() {
        let db = DatabaseConfig::default();
        assert_eq!(db.display_target(), "root@localhost:3306/miapi");
    }
}
