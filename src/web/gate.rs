use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;
use tracing::error;
use uuid::Uuid;

use crate::domain::Error;
use crate::web::{
    AppState,
    auth::{self, AuthAccount, Role, SESSION_COOKIE},
};

/// Resolve the session cookie to an account. Anything short of a valid,
/// unexpired session is an access failure.
pub async fn authenticate(state: &AppState, jar: &CookieJar) -> Result<AuthAccount, Error> {
    let Some(token_cookie) = jar.get(SESSION_COOKIE) else {
        return Err(Error::AccessDenied);
    };

    let token = Uuid::parse_str(token_cookie.value()).map_err(|_| Error::AccessDenied)?;

    match auth::fetch_account_by_session(state.pool_ref(), token).await? {
        Some(account) => Ok(account),
        None => Err(Error::AccessDenied),
    }
}

pub fn authorize(account: &AuthAccount, required: Role) -> Result<(), Error> {
    if account.role == required {
        Ok(())
    } else {
        Err(Error::AccessDenied)
    }
}

async fn require_role(
    state: &AppState,
    jar: &CookieJar,
    required: Role,
) -> Result<AuthAccount, Redirect> {
    let account = match authenticate(state, jar).await {
        Ok(account) => account,
        Err(Error::Database(err)) => {
            error!(?err, "failed to resolve session");
            return Err(Redirect::to("/login"));
        }
        Err(_) => return Err(Redirect::to("/login")),
    };

    if authorize(&account, required).is_err() {
        // Wrong household role: send them to their own dashboard instead of
        // the login page.
        let flash = match required {
            Role::Parent => "parent_required",
            Role::Child => "child_required",
        };
        return Err(Redirect::to(&format!(
            "{home}?error={flash}",
            home = account.role.home()
        )));
    }

    Ok(account)
}

pub async fn require_parent(state: &AppState, jar: &CookieJar) -> Result<AuthAccount, Redirect> {
    require_role(state, jar, Role::Parent).await
}

pub async fn require_child(state: &AppState, jar: &CookieJar) -> Result<AuthAccount, Redirect> {
    require_role(state, jar, Role::Child).await
}
