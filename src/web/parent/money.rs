use axum::{
    extract::{Form, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;

use crate::domain::Error;
use crate::ledger;
use crate::web::{AppState, auth, gate::require_parent};

#[derive(Deserialize)]
pub struct FineForm {
    pub description: String,
    pub amount: String,
}

#[derive(Deserialize)]
pub struct PaymentForm {
    pub amount: String,
}

pub async fn add_fine(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<FineForm>,
) -> Result<Redirect, Redirect> {
    let _parent = require_parent(&state, &jar).await?;

    let Some(child) = lookup_child(&state).await? else {
        return Ok(Redirect::to("/family?error=child_missing"));
    };

    if form.description.trim().is_empty() {
        return Ok(Redirect::to("/family?error=missing_description"));
    }

    let Ok(amount) = form.amount.trim().parse::<f64>() else {
        return Ok(Redirect::to("/family?error=invalid_amount"));
    };

    match ledger::add_fine(state.pool_ref(), child.id, &form.description, amount).await {
        Ok(()) => Ok(Redirect::to("/family?status=fine_added")),
        Err(Error::Validation(_)) => Ok(Redirect::to("/family?error=invalid_amount")),
        Err(err) => {
            error!(?err, "failed to record fine");
            Ok(Redirect::to("/family?error=unknown"))
        }
    }
}

pub async fn add_payment(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PaymentForm>,
) -> Result<Redirect, Redirect> {
    let _parent = require_parent(&state, &jar).await?;

    let Some(child) = lookup_child(&state).await? else {
        return Ok(Redirect::to("/family?error=child_missing"));
    };

    let Ok(amount) = form.amount.trim().parse::<f64>() else {
        return Ok(Redirect::to("/family?error=invalid_amount"));
    };

    match ledger::add_payment(state.pool_ref(), child.id, amount).await {
        Ok(()) => Ok(Redirect::to("/family?status=payment_added")),
        Err(Error::Validation(_)) => Ok(Redirect::to("/family?error=invalid_amount")),
        Err(err) => {
            error!(?err, "failed to record payment");
            Ok(Redirect::to("/family?error=unknown"))
        }
    }
}

async fn lookup_child(state: &AppState) -> Result<Option<auth::AuthAccount>, Redirect> {
    auth::fetch_child_account(state.pool_ref()).await.map_err(|err| {
        error!(?err, "failed to look up the child account");
        Redirect::to("/family?error=unknown")
    })
}
