use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;
use uuid::Uuid;

use crate::web::{
    AppState,
    auth::{self, SESSION_COOKIE},
    templates::render_login_page,
};

/// Root dispatch: signed-in accounts land on their role's dashboard,
/// everyone else sees the sign-in form.
pub async fn landing_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Redirect, Html<String>> {
    let maybe_account = if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            match auth::fetch_account_by_session(state.pool_ref(), token).await {
                Ok(account) => account,
                Err(err) => {
                    error!(?err, "failed to resolve session for landing page");
                    None
                }
            }
        } else {
            None
        }
    } else {
        None
    };

    match maybe_account {
        Some(account) => Ok(Redirect::to(account.role.home())),
        None => Err(Html(render_login_page(None, None))),
    }
}
