use std::borrow::Cow;
use std::collections::HashMap;

use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::catalog::{self, ChoreTypeRow};
use crate::domain::{Allowance, BalanceSummary, Error};
use crate::ledger;
use crate::submissions::{self, SubmissionRow};
use crate::web::{
    AppState,
    auth::AuthAccount,
    flash::compose_flash_message,
    gate::require_child,
    templates::{PageLayout, escape_html, format_money, render_page},
};

#[derive(Default, Deserialize)]
pub struct ChildDashboardQuery {
    pub status: Option<String>,
    pub error: Option<String>,
    pub chore_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct SubmitChoreForm {
    pub chore_type_id: Uuid,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

pub async fn child_dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ChildDashboardQuery>,
) -> Result<Html<String>, Redirect> {
    let account = require_child(&state, &jar).await?;
    let pool = state.pool();
    let today = Utc::now().date_naive();

    let chore_types = catalog::list_chore_types(&pool, true).await.map_err(|err| {
        error!(?err, "failed to load chore types for child dashboard");
        Redirect::to("/login")
    })?;

    let used_today = submissions::daily_used_counts(&pool, account.id, today)
        .await
        .map_err(|err| {
            error!(?err, "failed to count today's submissions");
            Redirect::to("/login")
        })?;

    let history = submissions::submissions_for_child(&pool, account.id)
        .await
        .map_err(|err| {
            error!(?err, "failed to load submission history");
            Redirect::to("/login")
        })?;

    let summary = ledger::balance_for(&pool, account.id).await.map_err(|err| {
        error!(?err, "failed to compute balance");
        Redirect::to("/login")
    })?;

    let flash = compose_child_flash(&params, &chore_types, today);

    Ok(Html(render_child_dashboard(
        &account,
        &chore_types,
        &used_today,
        &history,
        &summary,
        today,
        &flash,
    )))
}

pub async fn submit_chore(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SubmitChoreForm>,
) -> Result<Redirect, Redirect> {
    let account = require_child(&state, &jar).await?;

    let count = form.count.unwrap_or(1);
    let today = Utc::now().date_naive();

    let outcome = submissions::submit_chore(
        state.pool_ref(),
        account.id,
        form.chore_type_id,
        count,
        form.notes.as_deref(),
        today,
    )
    .await;

    match outcome {
        Ok(1) => Ok(Redirect::to("/chores?status=submitted")),
        Ok(_) => Ok(Redirect::to("/chores?status=submitted_many")),
        Err(Error::Validation(_)) => Ok(Redirect::to("/chores?error=invalid_count")),
        Err(Error::LimitExceeded { chore_type_id, .. }) => Ok(Redirect::to(&format!(
            "/chores?error=limit_reached&chore_id={chore_type_id}"
        ))),
        Err(Error::NotFound(_)) => Ok(Redirect::to("/chores?error=chore_missing")),
        Err(err) => {
            error!(?err, "failed to record chore submission");
            Ok(Redirect::to("/chores?error=unknown"))
        }
    }
}

/// The limit flash names the chore and date; everything else goes through the
/// shared code table.
fn compose_child_flash(
    params: &ChildDashboardQuery,
    chore_types: &[ChoreTypeRow],
    today: NaiveDate,
) -> String {
    if params.error.as_deref() == Some("limit_reached") {
        if let Some(chore) = params
            .chore_id
            .and_then(|id| chore_types.iter().find(|row| row.id == id))
        {
            return format!(
                r#"<div class="flash error">Daily limit already reached for "{name}" on {today}.</div>"#,
                name = escape_html(&chore.name),
            );
        }
    }

    compose_flash_message(params.status.as_deref(), params.error.as_deref())
}

fn render_child_dashboard(
    account: &AuthAccount,
    chore_types: &[ChoreTypeRow],
    used_today: &HashMap<Uuid, i64>,
    history: &[SubmissionRow],
    summary: &BalanceSummary,
    today: NaiveDate,
    flash: &str,
) -> String {
    let stats = render_stat_cards(summary);
    let available = render_available_chores(chore_types, used_today, today);
    let submissions = render_submission_history(history);

    let body = format!(
        r#"{stats}
        <section class="panel">
            <h2>Today's Chores</h2>
            <p class="note">Check off what you finished. A parent reviews every submission before it pays out.</p>
            {available}
        </section>
        <section class="panel">
            <h2>My Submissions</h2>
            {submissions}
        </section>"#,
    );

    render_page(PageLayout {
        meta_title: "My Chores",
        heading: "My Chores",
        note: "Finish chores, earn money, watch your balance grow.",
        username: &escape_html(&account.username),
        nav_html: Cow::Borrowed(""),
        flash_html: Cow::Owned(flash.to_string()),
        body_html: Cow::Owned(body),
    })
}

fn render_stat_cards(summary: &BalanceSummary) -> String {
    let cards = [
        ("Current balance", summary.balance),
        ("Approved earnings", summary.approved_earnings),
        ("Pending approval", summary.pending_total),
        ("Fines", -summary.total_fines),
        ("Paid out", -summary.total_payments),
    ];

    let mut html = String::from(r#"<div class="stat-grid">"#);
    for (label, amount) in cards {
        let class = if amount < 0.0 { "amount negative" } else { "amount" };
        html.push_str(&format!(
            r#"<div class="stat-card"><div class="label">{label}</div><div class="{class}">{value}</div></div>"#,
            value = format_money(amount),
        ));
    }
    html.push_str("</div>");
    html
}

fn render_available_chores(
    chore_types: &[ChoreTypeRow],
    used_today: &HashMap<Uuid, i64>,
    today: NaiveDate,
) -> String {
    if chore_types.is_empty() {
        return r#"<p class="muted">No chores have been set up yet.</p>"#.to_string();
    }

    let mut rows = String::new();
    for chore in chore_types {
        let allowance = Allowance {
            limit: chore.limits().on(today),
            used: used_today.get(&chore.id).copied().unwrap_or(0),
        };

        let today_cell = if allowance.limit == 0 {
            r#"<span class="muted">Not today</span>"#.to_string()
        } else {
            format!(
                "{used} of {limit} done, {remaining} left",
                used = allowance.used,
                limit = allowance.limit,
                remaining = allowance.remaining(),
            )
        };

        let submit_cell = if allowance.allows(1) {
            format!(
                r#"<form class="inline-form" method="post" action="/chores/submit">
                    <input type="hidden" name="chore_type_id" value="{id}">
                    <input type="number" name="count" value="1" min="1" max="{remaining}" style="width:4.5rem" aria-label="How many times">
                    <input name="notes" placeholder="Notes (optional)" style="width:11rem">
                    <button type="submit">I did this</button>
                </form>"#,
                id = chore.id,
                remaining = allowance.remaining(),
            )
        } else {
            r#"<span class="muted">Come back another day</span>"#.to_string()
        };

        rows.push_str(&format!(
            r#"<tr>
                <td><strong>{name}</strong><br><span class="note">{description}</span></td>
                <td>{value}</td>
                <td>{days}</td>
                <td>{today_cell}</td>
                <td>{submit_cell}</td>
            </tr>"#,
            name = escape_html(&chore.name),
            description = escape_html(&chore.description),
            value = format_money(chore.value),
            days = escape_html(&chore.limits().day_abbreviations()),
        ));
    }

    format!(
        r#"<table>
            <thead><tr><th>Chore</th><th>Pays</th><th>Days</th><th>Today</th><th></th></tr></thead>
            <tbody>{rows}</tbody>
        </table>"#,
    )
}

fn render_submission_history(history: &[SubmissionRow]) -> String {
    if history.is_empty() {
        return r#"<p class="muted">Nothing submitted yet.</p>"#.to_string();
    }

    let mut rows = String::new();
    for submission in history {
        let notes = submission
            .notes
            .as_deref()
            .map(escape_html)
            .unwrap_or_default();

        rows.push_str(&format!(
            r#"<tr>
                <td>{date}</td>
                <td>{name}</td>
                <td>{value}</td>
                <td><span class="status-tag {class}">{label}</span></td>
                <td>{notes}</td>
            </tr>"#,
            date = submission.submitted_on,
            name = escape_html(&submission.chore_name),
            value = format_money(submission.value),
            class = submission.status.css_class(),
            label = submission.status.label(),
        ));
    }

    format!(
        r#"<table>
            <thead><tr><th>Date</th><th>Chore</th><th>Value</th><th>Status</th><th>Notes</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>"#,
    )
}
