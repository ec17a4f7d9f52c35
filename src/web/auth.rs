use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration as ChronoDuration, Utc};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::error;
use uuid::Uuid;

use crate::web::{AppState, templates::render_login_page};

/// Household roles. Every gated page names the role it requires; the gate
/// checks it once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Child,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Child => "child",
        }
    }

    /// The dashboard this role lands on after signing in.
    pub fn home(self) -> &'static str {
        match self {
            Role::Parent => "/family",
            Role::Child => "/chores",
        }
    }
}

#[derive(Clone, sqlx::FromRow)]
pub struct DbAccountAuth {
    pub id: Uuid,
    pub password_hash: String,
}

#[derive(Clone, sqlx::FromRow)]
pub struct AuthAccount {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

pub const SESSION_COOKIE: &str = "auth_token";
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Default, Deserialize)]
pub struct LoginQuery {
    pub status: Option<String>,
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<LoginQuery>,
) -> Result<Html<String>, Redirect> {
    if let Some(redirect) = redirect_if_authenticated(&state, &jar).await {
        return Err(redirect);
    }

    let notice = match params.status.as_deref() {
        Some("logged_out") => Some("Signed out. See you next time."),
        _ => None,
    };

    Ok(Html(render_login_page(notice, None)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    let username = form.username.trim();
    let pool = state.pool();

    let account = match fetch_account_by_username(&pool, username).await {
        Ok(Some(account)) => account,
        Ok(None) => return Err(invalid_credentials()),
        Err(err) => {
            error!(?err, "failed to fetch account during login");
            return Err(server_error());
        }
    };

    if !verify_password(&form.password, &account.password_hash) {
        return Err(invalid_credentials());
    }

    let session_token = Uuid::new_v4();
    let expires_at = Utc::now() + ChronoDuration::days(SESSION_TTL_DAYS);

    if let Err(err) =
        sqlx::query("INSERT INTO sessions (id, account_id, expires_at) VALUES (?, ?, ?)")
            .bind(session_token)
            .bind(account.id)
            .bind(expires_at)
            .execute(state.pool_ref())
            .await
    {
        error!(?err, "failed to create session");
        return Err(server_error());
    }

    let mut cookie = Cookie::new(SESSION_COOKIE, session_token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::days(SESSION_TTL_DAYS));

    let jar = jar.add(cookie);
    Ok((jar, Redirect::to("/")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            if let Err(err) = sqlx::query("DELETE FROM sessions WHERE id = ?")
                .bind(token)
                .execute(state.pool_ref())
                .await
            {
                error!(?err, "failed to remove session during logout");
            }
        }
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));
    jar = jar.remove(removal);

    (jar, Redirect::to("/login?status=logged_out"))
}

pub async fn redirect_if_authenticated(state: &AppState, jar: &CookieJar) -> Option<Redirect> {
    let token_cookie = jar.get(SESSION_COOKIE)?;
    let token = Uuid::parse_str(token_cookie.value()).ok()?;
    let pool = state.pool();

    match fetch_account_by_session(&pool, token).await {
        Ok(Some(_)) => Some(Redirect::to("/")),
        Ok(None) => None,
        Err(err) => {
            error!(?err, "failed to validate session for access gate");
            None
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn fetch_account_by_username(
    pool: &SqlitePool,
    username: &str,
) -> sqlx::Result<Option<DbAccountAuth>> {
    sqlx::query_as::<_, DbAccountAuth>(
        "SELECT id, password_hash FROM accounts WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_account_by_session(
    pool: &SqlitePool,
    token: Uuid,
) -> sqlx::Result<Option<AuthAccount>> {
    sqlx::query_as::<_, AuthAccount>(
        "SELECT accounts.id, accounts.username, accounts.role FROM sessions \
         JOIN accounts ON accounts.id = sessions.account_id \
         WHERE sessions.id = ? AND sessions.expires_at > ?",
    )
    .bind(token)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
}

/// The single child account the household tracks money for.
pub async fn fetch_child_account(pool: &SqlitePool) -> sqlx::Result<Option<AuthAccount>> {
    sqlx::query_as::<_, AuthAccount>(
        "SELECT id, username, role FROM accounts WHERE role = 'child' ORDER BY created_at LIMIT 1",
    )
    .fetch_optional(pool)
    .await
}

fn invalid_credentials() -> (StatusCode, Html<String>) {
    (
        StatusCode::UNAUTHORIZED,
        Html(render_login_page(None, Some("Invalid username or password."))),
    )
}

fn server_error() -> (StatusCode, Html<String>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render_login_page(
            None,
            Some("Something went wrong. Please try again."),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("cat").unwrap();
        assert!(verify_password("cat", &hash));
        assert!(!verify_password("dog", &hash));
    }

    #[test]
    fn garbage_hashes_never_verify() {
        assert!(!verify_password("cat", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn expired_sessions_do_not_resolve() {
        let pool = crate::testutil::memory_pool().await;
        let account = crate::testutil::insert_account(&pool, "parent", Role::Parent).await;

        let fresh = Uuid::new_v4();
        sqlx::query("INSERT INTO sessions (id, account_id, expires_at) VALUES (?, ?, ?)")
            .bind(fresh)
            .bind(account)
            .bind(Utc::now() + ChronoDuration::days(1))
            .execute(&pool)
            .await
            .unwrap();

        let stale = Uuid::new_v4();
        sqlx::query("INSERT INTO sessions (id, account_id, expires_at) VALUES (?, ?, ?)")
            .bind(stale)
            .bind(account)
            .bind(Utc::now() - ChronoDuration::days(1))
            .execute(&pool)
            .await
            .unwrap();

        let resolved = fetch_account_by_session(&pool, fresh).await.unwrap();
        assert_eq!(resolved.unwrap().role, Role::Parent);

        assert!(fetch_account_by_session(&pool, stale).await.unwrap().is_none());
    }
}
