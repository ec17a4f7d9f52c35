use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;

use crate::domain::BalanceSummary;
use crate::ledger::{self, LedgerEntryRow};
use crate::submissions::{self, SubmissionRow};
use crate::web::{
    AppState,
    auth::{self, AuthAccount},
    flash::compose_flash_message,
    gate::require_parent,
    templates::{PageLayout, escape_html, format_money, render_page},
};

const RECENT_APPROVED_LIMIT: i64 = 20;

#[derive(Default, Deserialize)]
pub struct ParentDashboardQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

pub async fn parent_dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ParentDashboardQuery>,
) -> Result<Html<String>, Redirect> {
    let account = require_parent(&state, &jar).await?;
    let pool = state.pool();

    let flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());

    let child = auth::fetch_child_account(&pool).await.map_err(|err| {
        error!(?err, "failed to look up the child account");
        Redirect::to("/login")
    })?;

    let Some(child) = child else {
        return Ok(Html(render_missing_child_page(&account, &flash)));
    };

    let pending = submissions::pending_submissions(&pool).await.map_err(|err| {
        error!(?err, "failed to load pending submissions");
        Redirect::to("/login")
    })?;

    let approved = submissions::recently_approved(&pool, RECENT_APPROVED_LIMIT)
        .await
        .map_err(|err| {
            error!(?err, "failed to load approved submissions");
            Redirect::to("/login")
        })?;

    let entries = ledger::entries_for_child(&pool, child.id).await.map_err(|err| {
        error!(?err, "failed to load the ledger");
        Redirect::to("/login")
    })?;

    let summary = ledger::balance_for(&pool, child.id).await.map_err(|err| {
        error!(?err, "failed to compute balance");
        Redirect::to("/login")
    })?;

    Ok(Html(render_parent_dashboard(
        &account, &child, &pending, &approved, &entries, &summary, &flash,
    )))
}

fn render_parent_dashboard(
    account: &AuthAccount,
    child: &AuthAccount,
    pending: &[SubmissionRow],
    approved: &[SubmissionRow],
    entries: &[LedgerEntryRow],
    summary: &BalanceSummary,
    flash: &str,
) -> String {
    let child_name = escape_html(&child.username);
    let stats = render_stat_cards(summary);
    let pending_html = render_pending_reviews(pending);
    let approved_html = render_recent_approved(approved);
    let ledger_html = render_ledger_history(entries);

    let body = format!(
        r#"{stats}
        <section class="panel">
            <h2>Waiting for Review</h2>
            <p class="note">Approving pays the chore into {child_name}'s balance. Rejecting frees the day's slot again.</p>
            {pending_html}
        </section>
        <section class="panel">
            <h2>Fines and Payments</h2>
            <div class="form-row">
                <form method="post" action="/family/fines">
                    <h3>Add a fine</h3>
                    <label for="fine-description">Reason</label>
                    <input id="fine-description" name="description" placeholder="Lost library book" required>
                    <label for="fine-amount">Amount</label>
                    <input id="fine-amount" name="amount" inputmode="decimal" placeholder="5.00" required>
                    <button type="submit" class="danger" style="margin-top:0.75rem">Add fine</button>
                </form>
                <form method="post" action="/family/payments">
                    <h3>Record a payment</h3>
                    <p class="note">Money actually handed over, settling part of the balance.</p>
                    <label for="payment-amount">Amount</label>
                    <input id="payment-amount" name="amount" inputmode="decimal" placeholder="10.00" required>
                    <button type="submit" style="margin-top:0.75rem">Record payment</button>
                </form>
            </div>
        </section>
        <section class="panel">
            <h2>Recently Approved</h2>
            {approved_html}
        </section>
        <section class="panel">
            <h2>Ledger</h2>
            {ledger_html}
        </section>"#,
    );

    render_page(PageLayout {
        meta_title: "Parent Dashboard",
        heading: "Parent Dashboard",
        note: "Review submitted chores and keep the household books straight.",
        username: &escape_html(&account.username),
        nav_html: Cow::Borrowed(r#"<a class="nav-link" href="/family/chore-types">Manage chores</a>"#),
        flash_html: Cow::Owned(flash.to_string()),
        body_html: Cow::Owned(body),
    })
}

fn render_missing_child_page(account: &AuthAccount, flash: &str) -> String {
    let body = r#"<section class="panel">
            <h2>No child account yet</h2>
            <p class="note">Create a child account before tracking chores and balances.</p>
        </section>"#
        .to_string();

    render_page(PageLayout {
        meta_title: "Parent Dashboard",
        heading: "Parent Dashboard",
        note: "Review submitted chores and keep the household books straight.",
        username: &escape_html(&account.username),
        nav_html: Cow::Borrowed(r#"<a class="nav-link" href="/family/chore-types">Manage chores</a>"#),
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

fn render_pending_reviews(pending: &[SubmissionRow]) -> String {
    if pending.is_empty() {
        return r#"<p class="muted">Nothing waiting for review.</p>"#.to_string();
    }

    let mut rows = String::new();
    for submission in pending {
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
                <td>{notes}</td>
                <td>
                    <form class="inline-form" method="post" action="/family/reviews/approve">
                        <input type="hidden" name="submission_id" value="{id}">
                        <button type="submit">Approve</button>
                    </form>
                    <form class="inline-form" method="post" action="/family/reviews/reject">
                        <input type="hidden" name="submission_id" value="{id}">
                        <button type="submit" class="quiet">Reject</button>
                    </form>
                </td>
            </tr>"#,
            date = submission.submitted_on,
            name = escape_html(&submission.chore_name),
            value = format_money(submission.value),
            id = submission.id,
        ));
    }

    format!(
        r#"<table>
            <thead><tr><th>Date</th><th>Chore</th><th>Value</th><th>Notes</th><th>Review</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>"#,
    )
}

fn render_recent_approved(approved: &[SubmissionRow]) -> String {
    if approved.is_empty() {
        return r#"<p class="muted">No approved chores yet.</p>"#.to_string();
    }

    let mut rows = String::new();
    for submission in approved {
        let reviewed = submission
            .reviewed_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        rows.push_str(&format!(
            r#"<tr><td>{reviewed}</td><td>{name}</td><td>{value}</td></tr>"#,
            name = escape_html(&submission.chore_name),
            value = format_money(submission.value),
        ));
    }

    format!(
        r#"<table>
            <thead><tr><th>Approved at</th><th>Chore</th><th>Value</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>"#,
    )
}

fn render_ledger_history(entries: &[LedgerEntryRow]) -> String {
    if entries.is_empty() {
        return r#"<p class="muted">The ledger is empty.</p>"#.to_string();
    }

    let mut rows = String::new();
    for entry in entries {
        rows.push_str(&format!(
            r#"<tr>
                <td>{date}</td>
                <td>{kind}</td>
                <td>{description}</td>
                <td>{amount}</td>
            </tr>"#,
            date = entry.created_at.format("%Y-%m-%d %H:%M"),
            kind = entry.kind.label(),
            description = escape_html(&entry.description),
            amount = format_money(entry.signed_amount()),
        ));
    }

    format!(
        r#"<table>
            <thead><tr><th>Date</th><th>Kind</th><th>Description</th><th>Amount</th></tr></thead>
            <tbody>{rows}</tbody>
        </table>"#,
    )
}
