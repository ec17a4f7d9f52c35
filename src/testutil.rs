use chrono::Utc;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use uuid::Uuid;

use crate::web::auth::Role;

/// Fresh in-memory database with the schema applied. A single connection
/// keeps every query in the test on the same memory store.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to open in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to apply migrations");

    pool
}

pub async fn insert_account(pool: &SqlitePool, username: &str, role: Role) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO accounts (id, username, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(username)
    .bind("unusable-test-hash")
    .bind(role)
    .bind(Utc::now())
    .execute(pool)
    .await
    .expect("failed to insert account");
    id
}

pub async fn insert_child(pool: &SqlitePool) -> Uuid {
    insert_account(pool, "kid", Role::Child).await
}
