use std::borrow::Cow;

use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::catalog::{self, ChoreTypeRow, ChoreTypeSpec};
use crate::domain::{Error, limits::DAYS_PER_WEEK};
use crate::web::{
    AppState,
    auth::AuthAccount,
    flash::compose_flash_message,
    gate::require_parent,
    templates::{PageLayout, escape_html, format_money, render_page},
};

const DAY_FIELDS: [(&str, &str); DAYS_PER_WEEK] = [
    ("sunday", "Sun"),
    ("monday", "Mon"),
    ("tuesday", "Tue"),
    ("wednesday", "Wed"),
    ("thursday", "Thu"),
    ("friday", "Fri"),
    ("saturday", "Sat"),
];

#[derive(Default, Deserialize)]
pub struct ChoreTypesQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct ChoreTypeCreateForm {
    pub name: String,
    pub description: String,
    pub value: String,
    #[serde(default)]
    pub sunday: String,
    #[serde(default)]
    pub monday: String,
    #[serde(default)]
    pub tuesday: String,
    #[serde(default)]
    pub wednesday: String,
    #[serde(default)]
    pub thursday: String,
    #[serde(default)]
    pub friday: String,
    #[serde(default)]
    pub saturday: String,
}

#[derive(Deserialize)]
pub struct ChoreTypeUpdateForm {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub value: String,
    #[serde(default)]
    pub sunday: String,
    #[serde(default)]
    pub monday: String,
    #[serde(default)]
    pub tuesday: String,
    #[serde(default)]
    pub wednesday: String,
    #[serde(default)]
    pub thursday: String,
    #[serde(default)]
    pub friday: String,
    #[serde(default)]
    pub saturday: String,
}

#[derive(Deserialize)]
pub struct ToggleChoreForm {
    pub id: Uuid,
    pub activate: String,
}

pub async fn chore_types_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ChoreTypesQuery>,
) -> Result<Html<String>, Redirect> {
    let account = require_parent(&state, &jar).await?;

    let chore_types = catalog::list_chore_types(state.pool_ref(), false)
        .await
        .map_err(|err| {
            error!(?err, "failed to load chore types");
            Redirect::to("/login")
        })?;

    let flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());

    Ok(Html(render_chore_types_page(&account, &chore_types, &flash)))
}

pub async fn create_chore_type(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ChoreTypeCreateForm>,
) -> Result<Redirect, Redirect> {
    let _parent = require_parent(&state, &jar).await?;

    let spec = match parse_spec(
        &form.name,
        &form.description,
        &form.value,
        [
            &form.sunday,
            &form.monday,
            &form.tuesday,
            &form.wednesday,
            &form.thursday,
            &form.friday,
            &form.saturday,
        ],
    ) {
        Ok(spec) => spec,
        Err(code) => return Ok(Redirect::to(&format!("/family/chore-types?error={code}"))),
    };

    match catalog::create_chore_type(state.pool_ref(), &spec).await {
        Ok(_) => Ok(Redirect::to("/family/chore-types?status=chore_created")),
        Err(Error::Validation(_)) => Ok(Redirect::to("/family/chore-types?error=missing_fields")),
        Err(err) => {
            error!(?err, "failed to create chore type");
            Ok(Redirect::to("/family/chore-types?error=unknown"))
        }
    }
}

pub async fn update_chore_type(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ChoreTypeUpdateForm>,
) -> Result<Redirect, Redirect> {
    let _parent = require_parent(&state, &jar).await?;

    let spec = match parse_spec(
        &form.name,
        &form.description,
        &form.value,
        [
            &form.sunday,
            &form.monday,
            &form.tuesday,
            &form.wednesday,
            &form.thursday,
            &form.friday,
            &form.saturday,
        ],
    ) {
        Ok(spec) => spec,
        Err(code) => return Ok(Redirect::to(&format!("/family/chore-types?error={code}"))),
    };

    match catalog::update_chore_type(state.pool_ref(), form.id, &spec).await {
        Ok(()) => Ok(Redirect::to("/family/chore-types?status=chore_updated")),
        Err(Error::NotFound(_)) => Ok(Redirect::to("/family/chore-types?error=chore_missing")),
        Err(Error::Validation(_)) => Ok(Redirect::to("/family/chore-types?error=missing_fields")),
        Err(err) => {
            error!(?err, "failed to update chore type");
            Ok(Redirect::to("/family/chore-types?error=unknown"))
        }
    }
}

pub async fn toggle_chore_type(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ToggleChoreForm>,
) -> Result<Redirect, Redirect> {
    let _parent = require_parent(&state, &jar).await?;

    let activate = form.activate == "1";

    match catalog::set_chore_type_active(state.pool_ref(), form.id, activate).await {
        Ok(()) => {
            let status = if activate {
                "chore_activated"
            } else {
                "chore_deactivated"
            };
            Ok(Redirect::to(&format!("/family/chore-types?status={status}")))
        }
        Err(Error::NotFound(_)) => Ok(Redirect::to("/family/chore-types?error=chore_missing")),
        Err(err) => {
            error!(?err, "failed to toggle chore type");
            Ok(Redirect::to("/family/chore-types?error=unknown"))
        }
    }
}

/// Turn raw form fields into a validated spec, mapping each failure to its
/// flash code. Empty limit fields mean 0.
fn parse_spec(
    name: &str,
    description: &str,
    value: &str,
    limit_fields: [&str; DAYS_PER_WEEK],
) -> Result<ChoreTypeSpec, &'static str> {
    if name.trim().is_empty() || description.trim().is_empty() {
        return Err("missing_fields");
    }

    let value: f64 = value.trim().parse().map_err(|_| "invalid_value")?;
    if !(value.is_finite() && value > 0.0) {
        return Err("invalid_value");
    }

    let mut limits = [0_i64; DAYS_PER_WEEK];
    for (slot, raw) in limits.iter_mut().zip(limit_fields) {
        let raw = raw.trim();
        let parsed: i64 = if raw.is_empty() {
            0
        } else {
            raw.parse().map_err(|_| "invalid_limit")?
        };
        if parsed < 0 {
            return Err("invalid_limit");
        }
        *slot = parsed;
    }

    Ok(ChoreTypeSpec {
        name: name.trim().to_string(),
        description: description.trim().to_string(),
        value,
        limits,
    })
}

fn render_chore_types_page(
    account: &AuthAccount,
    chore_types: &[ChoreTypeRow],
    flash: &str,
) -> String {
    let mut body = String::new();

    body.push_str(&format!(
        r#"<section class="panel">
            <h2>Add a Chore</h2>
            <p class="note">Set a value and how many times it can be submitted on each weekday. A day set to 0 means the chore is off that day.</p>
            <form method="post" action="/family/chore-types">
                {fields}
                <button type="submit">Create chore</button>
            </form>
        </section>"#,
        fields = render_chore_fields(None),
    ));

    if chore_types.is_empty() {
        body.push_str(
            r#"<section class="panel"><p class="muted">No chores defined yet.</p></section>"#,
        );
    }

    for chore in chore_types {
        let badge = if chore.active {
            r#"<span class="status-tag approved">Active</span>"#
        } else {
            r#"<span class="status-tag rejected">Inactive</span>"#
        };
        let toggle_label = if chore.active { "Deactivate" } else { "Activate" };
        let toggle_value = if chore.active { "0" } else { "1" };

        body.push_str(&format!(
            r#"<section class="panel">
            <h2>{name} {badge}</h2>
            <p class="note">Pays {value} · available {days}</p>
            <form method="post" action="/family/chore-types/update">
                <input type="hidden" name="id" value="{id}">
                {fields}
                <button type="submit">Save changes</button>
            </form>
            <form method="post" action="/family/chore-types/toggle" style="margin-top:0.75rem">
                <input type="hidden" name="id" value="{id}">
                <input type="hidden" name="activate" value="{toggle_value}">
                <button type="submit" class="quiet">{toggle_label}</button>
            </form>
        </section>"#,
            name = escape_html(&chore.name),
            value = format_money(chore.value),
            days = escape_html(&chore.limits().day_abbreviations()),
            id = chore.id,
            fields = render_chore_fields(Some(chore)),
        ));
    }

    render_page(PageLayout {
        meta_title: "Manage Chores",
        heading: "Manage Chores",
        note: "Chore templates the household runs on. Deactivated chores keep their history.",
        username: &escape_html(&account.username),
        nav_html: Cow::Borrowed(r#"<a class="nav-link" href="/family">← Back to dashboard</a>"#),
        flash_html: Cow::Owned(flash.to_string()),
        body_html: Cow::Owned(body),
    })
}

fn render_chore_fields(chore: Option<&ChoreTypeRow>) -> String {
    let name = chore.map(|c| escape_html(&c.name)).unwrap_or_default();
    let description = chore.map(|c| escape_html(&c.description)).unwrap_or_default();
    let value = chore.map(|c| format!("{:.2}", c.value)).unwrap_or_default();

    // Sunday-first, matching the form field order.
    let day_values: [i64; DAYS_PER_WEEK] = match chore {
        Some(c) => [
            c.sunday_limit,
            c.monday_limit,
            c.tuesday_limit,
            c.wednesday_limit,
            c.thursday_limit,
            c.friday_limit,
            c.saturday_limit,
        ],
        None => [0; DAYS_PER_WEEK],
    };

    let mut day_inputs = String::from(r#"<div class="day-grid">"#);
    for ((field, label), current) in DAY_FIELDS.into_iter().zip(day_values) {
        day_inputs.push_str(&format!(
            r#"<div><label>{label}</label><input type="number" name="{field}" value="{current}" min="0"></div>"#,
        ));
    }
    day_inputs.push_str("</div>");

    format!(
        r#"<label>Name</label>
        <input name="name" value="{name}" required>
        <label>Description</label>
        <input name="description" value="{description}" required>
        <label>Value</label>
        <input name="value" inputmode="decimal" value="{value}" placeholder="2.50" required>
        <label style="margin-top:0.75rem">Daily limits</label>
        {day_inputs}"#,
    )
}
