use axum::{
    extract::{Form, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::domain::Error;
use crate::submissions;
use crate::web::{AppState, gate::require_parent};

#[derive(Deserialize)]
pub struct ReviewForm {
    pub submission_id: Uuid,
}

pub async fn approve_submission(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect, Redirect> {
    let _parent = require_parent(&state, &jar).await?;

    match submissions::approve_submission(state.pool_ref(), form.submission_id).await {
        Ok(()) => Ok(Redirect::to("/family?status=approved")),
        Err(Error::Conflict(_)) => Ok(Redirect::to("/family?error=already_reviewed")),
        Err(Error::NotFound(_)) => Ok(Redirect::to("/family?error=submission_missing")),
        Err(err) => {
            error!(?err, "failed to approve submission");
            Ok(Redirect::to("/family?error=unknown"))
        }
    }
}

pub async fn reject_submission(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect, Redirect> {
    let _parent = require_parent(&state, &jar).await?;

    match submissions::reject_submission(state.pool_ref(), form.submission_id).await {
        Ok(()) => Ok(Redirect::to("/family?status=rejected")),
        Err(Error::Conflict(_)) => Ok(Redirect::to("/family?error=already_reviewed")),
        Err(Error::NotFound(_)) => Ok(Redirect::to("/family?error=submission_missing")),
        Err(err) => {
            error!(?err, "failed to reject submission");
            Ok(Redirect::to("/family?error=unknown"))
        }
    }
}
