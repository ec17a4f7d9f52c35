use std::{env, str::FromStr};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;
use uuid::Uuid;

use crate::web::auth::{self, Role};

const DEFAULT_DATABASE_URL: &str = "sqlite:chores.db";

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let options = SqliteConnectOptions::from_str(&database_url)
            .context("invalid DATABASE_URL")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to open the household database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        Ok(Self { pool })
    }

    /// Seed one account per role so the household can sign in on first run.
    pub async fn ensure_seed_accounts(&self) -> Result<()> {
        self.ensure_account(Role::Parent, "parent").await?;
        self.ensure_account(Role::Child, "kid").await?;
        Ok(())
    }

    async fn ensure_account(&self, role: Role, username: &str) -> Result<()> {
        let present: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE role = ?)")
                .bind(role)
                .fetch_one(&self.pool)
                .await
                .context("failed to verify account presence")?;

        if !present {
            let password_hash = auth::hash_password("change-me")
                .map_err(|err| anyhow!("failed to hash seed password: {err}"))?;

            sqlx::query(
                "INSERT INTO accounts (id, username, password_hash, role, created_at) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(password_hash)
            .bind(role)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .context("failed to insert seed account")?;

            info!(
                "Seeded {} account '{}' (password: 'change-me'). Update it promptly.",
                role.label(),
                username
            );
        }

        Ok(())
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub fn pool_ref(&self) -> &SqlitePool {
        &self.pool
    }
}
