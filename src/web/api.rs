use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::domain::{BalanceSummary, Error};
use crate::ledger;
use crate::web::{
    ApiMessage, AppState,
    auth::{self, Role},
    gate, json_error,
};

#[derive(Serialize)]
pub(crate) struct BalanceResponse {
    child: String,
    #[serde(flatten)]
    summary: BalanceSummary,
    generated_at: String,
}

/// Balance snapshot for the signed-in household. The child sees their own
/// numbers; the parent sees the child's.
pub async fn balance(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<BalanceResponse>, (StatusCode, Json<ApiMessage>)> {
    let account = gate::authenticate(&state, &jar).await.map_err(|err| match err {
        Error::Database(err) => {
            error!(?err, "failed to resolve session for balance API");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
        }
        _ => json_error(StatusCode::UNAUTHORIZED, "Sign in to view the balance."),
    })?;

    let pool = state.pool();

    let child = match account.role {
        Role::Child => account,
        Role::Parent => match auth::fetch_child_account(&pool).await {
            Ok(Some(child)) => child,
            Ok(None) => {
                return Err(json_error(StatusCode::NOT_FOUND, "No child account found."));
            }
            Err(err) => {
                error!(?err, "failed to look up the child account");
                return Err(json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong.",
                ));
            }
        },
    };

    let summary: BalanceSummary = match ledger::balance_for(&pool, child.id).await {
        Ok(summary) => summary,
        Err(err) => {
            error!(?err, "failed to compute balance");
            return Err(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong.",
            ));
        }
    };

    Ok(Json(BalanceResponse {
        child: child.username,
        summary,
        generated_at: Utc::now().to_rfc3339(),
    }))
}
