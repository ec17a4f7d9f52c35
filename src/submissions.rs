use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::catalog::ChoreTypeRow;
use crate::domain::{Allowance, EntryKind, Error};

/// Review state of a submission. `Pending` is the only state that can move;
/// `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

/// One reported chore completion, joined with its template's name. `value`
/// is captured when the child submits, so later template edits never change
/// what a historical submission pays.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub chore_type_id: Uuid,
    pub chore_name: String,
    pub child_id: Uuid,
    pub value: f64,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    pub submitted_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

const SUBMISSION_COLUMNS: &str = "s.id, s.chore_type_id, c.name AS chore_name, s.child_id, \
     s.value, s.status, s.notes, s.submitted_on, s.created_at, s.reviewed_at";

async fn daily_used<'e, E>(
    executor: E,
    child_id: Uuid,
    chore_type_id: Uuid,
    date: NaiveDate,
) -> sqlx::Result<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM submissions WHERE child_id = ? AND chore_type_id = ? \
         AND submitted_on = ? AND status IN ('pending', 'approved')",
    )
    .bind(child_id)
    .bind(chore_type_id)
    .bind(date)
    .fetch_one(executor)
    .await
}

/// Display-time allowance for one chore type. The authoritative check runs
/// again inside [`submit_chore`]'s transaction.
pub async fn allowance_for(
    pool: &SqlitePool,
    chore: &ChoreTypeRow,
    child_id: Uuid,
    date: NaiveDate,
) -> sqlx::Result<Allowance> {
    let used = daily_used(pool, child_id, chore.id, date).await?;
    Ok(Allowance {
        limit: chore.limits().on(date),
        used,
    })
}

/// Pending+approved counts per chore type for one child and day, keyed by
/// chore type id. Chore types without submissions today are absent.
pub async fn daily_used_counts(
    pool: &SqlitePool,
    child_id: Uuid,
    date: NaiveDate,
) -> sqlx::Result<HashMap<Uuid, i64>> {
    let rows: Vec<(Uuid, i64)> = sqlx::query_as(
        "SELECT chore_type_id, COUNT(*) FROM submissions WHERE child_id = ? \
         AND submitted_on = ? AND status IN ('pending', 'approved') GROUP BY chore_type_id",
    )
    .bind(child_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// Record `count` completions of one chore type for the given day.
///
/// The day's allowance is re-counted inside the insert transaction, so two
/// racing submissions at the limit boundary cannot both land.
pub async fn submit_chore(
    pool: &SqlitePool,
    child_id: Uuid,
    chore_type_id: Uuid,
    count: i64,
    notes: Option<&str>,
    date: NaiveDate,
) -> Result<i64, Error> {
    if count < 1 {
        return Err(Error::validation("submission count must be at least 1"));
    }

    let notes = notes.map(str::trim).filter(|value| !value.is_empty());

    let mut tx = pool.begin().await?;

    let chore = sqlx::query_as::<_, ChoreTypeRow>(
        "SELECT * FROM chore_types WHERE id = ? AND active = 1",
    )
    .bind(chore_type_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(Error::NotFound("chore type"))?;

    let allowance = Allowance {
        limit: chore.limits().on(date),
        used: daily_used(&mut *tx, child_id, chore_type_id, date).await?,
    };

    if !allowance.allows(count) {
        return Err(Error::LimitExceeded {
            chore_type_id,
            name: chore.name,
            date,
            remaining: allowance.remaining(),
        });
    }

    let now = Utc::now();
    for _ in 0..count {
        sqlx::query(
            "INSERT INTO submissions (id, chore_type_id, child_id, value, status, notes, \
             submitted_on, created_at) VALUES (?, ?, ?, ?, 'pending', ?, ?, ?)",
        )
        .bind(Uuid::new_v4())
        .bind(chore_type_id)
        .bind(child_id)
        .bind(chore.value)
        .bind(notes)
        .bind(date)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(count)
}

/// Flip a pending submission to approved and write the matching ledger
/// entry, atomically. Retrying an already-reviewed submission fails with a
/// conflict and leaves the ledger untouched.
pub async fn approve_submission(pool: &SqlitePool, id: Uuid) -> Result<(), Error> {
    let mut tx = pool.begin().await?;

    let (child_id, value, chore_name) = take_pending(&mut tx, id, SubmissionStatus::Approved).await?;

    sqlx::query(
        "INSERT INTO ledger_entries (id, child_id, kind, description, amount, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4())
    .bind(child_id)
    .bind(EntryKind::Chore)
    .bind(format!("Approved: {chore_name}"))
    .bind(value)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Terminal rejection: the slot it occupied becomes available again and no
/// ledger entry is written.
pub async fn reject_submission(pool: &SqlitePool, id: Uuid) -> Result<(), Error> {
    let mut tx = pool.begin().await?;
    take_pending(&mut tx, id, SubmissionStatus::Rejected).await?;
    tx.commit().await?;
    Ok(())
}

async fn take_pending(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    id: Uuid,
    next: SubmissionStatus,
) -> Result<(Uuid, f64, String), Error> {
    let row: Option<(Uuid, f64, String, SubmissionStatus)> = sqlx::query_as(
        "SELECT s.child_id, s.value, c.name, s.status FROM submissions s \
         JOIN chore_types c ON c.id = s.chore_type_id WHERE s.id = ?",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    let (child_id, value, chore_name, status) = row.ok_or(Error::NotFound("submission"))?;

    if status != SubmissionStatus::Pending {
        return Err(Error::conflict("submission was already reviewed"));
    }

    let result = sqlx::query(
        "UPDATE submissions SET status = ?, reviewed_at = ? WHERE id = ? AND status = 'pending'",
    )
    .bind(next)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::conflict("submission was already reviewed"));
    }

    Ok((child_id, value, chore_name))
}

pub async fn submissions_for_child(
    pool: &SqlitePool,
    child_id: Uuid,
) -> sqlx::Result<Vec<SubmissionRow>> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions s \
         JOIN chore_types c ON c.id = s.chore_type_id \
         WHERE s.child_id = ? ORDER BY s.created_at DESC",
    ))
    .bind(child_id)
    .fetch_all(pool)
    .await
}

pub async fn pending_submissions(pool: &SqlitePool) -> sqlx::Result<Vec<SubmissionRow>> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions s \
         JOIN chore_types c ON c.id = s.chore_type_id \
         WHERE s.status = 'pending' ORDER BY s.created_at DESC",
    ))
    .fetch_all(pool)
    .await
}

pub async fn recently_approved(pool: &SqlitePool, limit: i64) -> sqlx::Result<Vec<SubmissionRow>> {
    sqlx::query_as::<_, SubmissionRow>(&format!(
        "SELECT {SUBMISSION_COLUMNS} FROM submissions s \
         JOIN chore_types c ON c.id = s.chore_type_id \
         WHERE s.status = 'approved' ORDER BY s.reviewed_at DESC LIMIT ?",
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Captured values of a child's pending submissions, for the earnings
/// preview.
pub async fn pending_values(pool: &SqlitePool, child_id: Uuid) -> sqlx::Result<Vec<f64>> {
    sqlx::query_scalar(
        "SELECT value FROM submissions WHERE child_id = ? AND status = 'pending'",
    )
    .bind(child_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, ChoreTypeSpec};
    use crate::domain::limits::DAYS_PER_WEEK;
    use crate::testutil::{insert_child, memory_pool};

    // 2024-06-04 is a Tuesday, 2024-06-05 a Wednesday.
    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()
    }

    fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()
    }

    async fn chore_with_limits(
        pool: &SqlitePool,
        name: &str,
        value: f64,
        limits: [i64; DAYS_PER_WEEK],
    ) -> Uuid {
        catalog::create_chore_type(
            pool,
            &ChoreTypeSpec {
                name: name.to_string(),
                description: format!("{name} description"),
                value,
                limits,
            },
        )
        .await
        .unwrap()
    }

    async fn ledger_amounts(pool: &SqlitePool) -> Vec<f64> {
        sqlx::query_scalar("SELECT amount FROM ledger_entries ORDER BY created_at")
            .fetch_all(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn limit_boundary_is_enforced_at_submission_time() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        // Two allowed on Wednesdays.
        let chore = chore_with_limits(&pool, "Dishes", 1.0, [0, 0, 0, 2, 0, 0, 0]).await;

        submit_chore(&pool, child, chore, 1, None, wednesday()).await.unwrap();
        submit_chore(&pool, child, chore, 1, Some("extra scrubbing"), wednesday())
            .await
            .unwrap();

        let third = submit_chore(&pool, child, chore, 1, None, wednesday()).await;
        match third {
            Err(Error::LimitExceeded { remaining, ref name, .. }) => {
                assert_eq!(remaining, 0);
                assert_eq!(name, "Dishes");
            }
            other => panic!("expected limit error, got {other:?}"),
        }

        // A batch larger than what is left is refused whole.
        let row = catalog::fetch_chore_type(&pool, chore).await.unwrap();
        let allowance = allowance_for(&pool, &row, child, wednesday()).await.unwrap();
        assert_eq!(allowance.remaining(), 0);
    }

    #[tokio::test]
    async fn batch_larger_than_remaining_is_refused_whole() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        let chore = chore_with_limits(&pool, "Weeding", 2.0, [0, 0, 0, 3, 0, 0, 0]).await;

        submit_chore(&pool, child, chore, 2, None, wednesday()).await.unwrap();
        assert!(matches!(
            submit_chore(&pool, child, chore, 2, None, wednesday()).await,
            Err(Error::LimitExceeded { remaining: 1, .. })
        ));

        // Nothing was written for the refused batch.
        let used = daily_used(&pool, child, chore, wednesday()).await.unwrap();
        assert_eq!(used, 2);
    }

    #[tokio::test]
    async fn zero_limit_day_blocks_and_open_day_allows() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        // Available on Sunday and Wednesday only.
        let chore = chore_with_limits(&pool, "Take Out Trash", 2.0, [1, 0, 0, 1, 0, 0, 0]).await;

        assert!(matches!(
            submit_chore(&pool, child, chore, 1, None, tuesday()).await,
            Err(Error::LimitExceeded { remaining: 0, .. })
        ));

        submit_chore(&pool, child, chore, 1, None, wednesday()).await.unwrap();
        assert!(matches!(
            submit_chore(&pool, child, chore, 1, None, wednesday()).await,
            Err(Error::LimitExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn rejection_gives_the_slot_back() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        let chore = chore_with_limits(&pool, "Laundry", 1.0, [0, 0, 0, 1, 0, 0, 0]).await;

        submit_chore(&pool, child, chore, 1, None, wednesday()).await.unwrap();
        let pending = pending_submissions(&pool).await.unwrap();
        reject_submission(&pool, pending[0].id).await.unwrap();

        // The rejected row no longer counts against the day.
        submit_chore(&pool, child, chore, 1, None, wednesday()).await.unwrap();
        assert!(ledger_amounts(&pool).await.is_empty());
    }

    #[tokio::test]
    async fn approval_writes_one_ledger_entry_and_is_terminal() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        let chore = chore_with_limits(&pool, "Clean Room", 5.0, [1; DAYS_PER_WEEK]).await;

        submit_chore(&pool, child, chore, 1, None, wednesday()).await.unwrap();
        let submission = pending_submissions(&pool).await.unwrap()[0].id;

        approve_submission(&pool, submission).await.unwrap();
        assert_eq!(ledger_amounts(&pool).await, vec![5.0]);

        // Approving again must conflict without double-counting.
        assert!(matches!(
            approve_submission(&pool, submission).await,
            Err(Error::Conflict(_))
        ));
        assert_eq!(ledger_amounts(&pool).await, vec![5.0]);

        // Rejecting a terminal submission conflicts too.
        assert!(matches!(
            reject_submission(&pool, submission).await,
            Err(Error::Conflict(_))
        ));

        let history = submissions_for_child(&pool, child).await.unwrap();
        assert_eq!(history[0].status, SubmissionStatus::Approved);
        assert!(history[0].reviewed_at.is_some());
    }

    #[tokio::test]
    async fn captured_value_survives_template_edits() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        let chore = chore_with_limits(&pool, "Mow Lawn", 4.0, [1; DAYS_PER_WEEK]).await;

        submit_chore(&pool, child, chore, 1, None, wednesday()).await.unwrap();

        catalog::update_chore_type(
            &pool,
            chore,
            &ChoreTypeSpec {
                name: "Mow Lawn".to_string(),
                description: "front and back".to_string(),
                value: 9.0,
                limits: [1; DAYS_PER_WEEK],
            },
        )
        .await
        .unwrap();

        assert_eq!(pending_values(&pool, child).await.unwrap(), vec![4.0]);

        let submission = pending_submissions(&pool).await.unwrap()[0].id;
        approve_submission(&pool, submission).await.unwrap();
        assert_eq!(ledger_amounts(&pool).await, vec![4.0]);
    }

    #[tokio::test]
    async fn inactive_chores_cannot_be_submitted() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        let chore = chore_with_limits(&pool, "Dusting", 1.0, [1; DAYS_PER_WEEK]).await;

        catalog::set_chore_type_active(&pool, chore, false).await.unwrap();
        assert!(matches!(
            submit_chore(&pool, child, chore, 1, None, wednesday()).await,
            Err(Error::NotFound(_))
        ));
    }
}
