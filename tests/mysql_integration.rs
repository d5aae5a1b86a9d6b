//! Integration tests against a real MySQL store.
//!
//! These tests need a reachable MySQL server described by the `DB_*`
//! environment variables (see `Config`). The `usuarios` table is created if it
//! does not exist.
//! Run with: cargo test --test mysql_integration -- --ignored

use sqlx::mysql::MySqlPoolOptions;
use usuarios_api::config::DatabaseConfig;
use usuarios_api::store::{MySqlUserRepository, NewUser, Store, UserRepository};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS usuarios (
    id INT AUTO_INCREMENT PRIMARY KEY,
    nombre VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL
)";

/// Load store settings from the environment.
fn test_db_config() -> DatabaseConfig {
    dotenvy::dotenv().ok();
    envy::prefixed("DB_")
        .from_env()
        .expect("DB_* variables must deserialize")
}

async fn repository() -> MySqlUserRepository {
    let config = test_db_config();
    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .connect_with(config.connect_options())
        .await
        .expect("store must be reachable");
    sqlx::query(CREATE_TABLE)
        .execute(&pool)
        .await
        .expect("usuarios table must be creatable");
    pool.close().await;

    MySqlUserRepository::connect(&config)
        .await
        .expect("store must be reachable")
}

fn user(name: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

#[tokio::test]
#[ignore = "requires a MySQL server"]
async fn test_startup_connection_opens_gate() {
    let store = Store::connect(&test_db_config()).await;
    assert!(store.is_connected());
}

#[tokio::test]
#[ignore = "requires a MySQL server"]
async fn test_insert_then_list_contains_row() {
    let repo = repository().await;

    let created = repo.insert(&user("Ana")).await.unwrap();
    assert!(created.id > 0);

    let users = repo.list_all().await.unwrap();
    assert!(users.contains(&created), "listed users: {:?}", users);

    repo.delete_by_id(created.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a MySQL server"]
async fn test_update_and_delete_report_affected_rows() {
    let repo = repository().await;
    let created = repo.insert(&user("Luis")).await.unwrap();

    assert_eq!(repo.update_by_id(created.id, &user("Luisa")).await.unwrap(), 1);
    // Same values again: still counts as a matched row.
    assert_eq!(repo.update_by_id(created.id, &user("Luisa")).await.unwrap(), 1);

    assert_eq!(repo.delete_by_id(created.id).await.unwrap(), 1);
    assert_eq!(repo.delete_by_id(created.id).await.unwrap(), 0);
    assert_eq!(repo.update_by_id(created.id, &user("Luis")).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires a MySQL server"]
async fn test_ids_are_not_reused_after_delete() {
    let repo = repository().await;

    let first = repo.insert(&user("Eva")).await.unwrap();
    repo.delete_by_id(first.id).await.unwrap();
    let second = repo.insert(&user("Eva")).await.unwrap();

    assert!(second.id > first.id);
    repo.delete_by_id(second.id).await.unwrap();
}
