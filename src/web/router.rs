use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, api, auth, child, landing, parent};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::landing_page))
        .route("/login", get(auth::login_page).post(auth::process_login))
        .route("/logout", post(auth::logout))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .route("/chores", get(child::child_dashboard))
        .route("/chores/submit", post(child::submit_chore))
        .route("/family", get(parent::parent_dashboard))
        .route(
            "/family/chore-types",
            get(parent::chore_types_page).post(parent::create_chore_type),
        )
        .route(
            "/family/chore-types/update",
            post(parent::update_chore_type),
        )
        .route(
            "/family/chore-types/toggle",
            post(parent::toggle_chore_type),
        )
        .route("/family/reviews/approve", post(parent::approve_submission))
        .route("/family/reviews/reject", post(parent::reject_submission))
        .route("/family/fines", post(parent::add_fine))
        .route("/family/payments", post(parent::add_payment))
        .route("/api/balance", get(api::balance))
        .with_state(state)
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
