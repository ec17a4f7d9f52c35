use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::{BalanceSummary, EntryKind, Error, summarize};
use crate::submissions;

/// One append-only money record. `amount` is a positive magnitude; the kind
/// carries the direction (see [`EntryKind::signed`]).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LedgerEntryRow {
    pub id: Uuid,
    pub child_id: Uuid,
    pub kind: EntryKind,
    pub description: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntryRow {
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }
}

/// Record a fine against the child. Parent-only; enforced at the handler
/// boundary.
pub async fn add_fine(
    pool: &SqlitePool,
    child_id: Uuid,
    description: &str,
    amount: f64,
) -> Result<(), Error> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::validation("fine description is required"));
    }
    append_entry(pool, child_id, EntryKind::Fine, description, amount).await
}

/// Record money actually handed to the child, settling part of what is owed.
pub async fn add_payment(pool: &SqlitePool, child_id: Uuid, amount: f64) -> Result<(), Error> {
    append_entry(pool, child_id, EntryKind::Payment, "Payment made", amount).await
}

async fn append_entry(
    pool: &SqlitePool,
    child_id: Uuid,
    kind: EntryKind,
    description: &str,
    amount: f64,
) -> Result<(), Error> {
    if !(amount.is_finite() && amount > 0.0) {
        return Err(Error::validation("amount must be above zero"));
    }

    sqlx::query(
        "INSERT INTO ledger_entries (id, child_id, kind, description, amount, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4())
    .bind(child_id)
    .bind(kind)
    .bind(description)
    .bind(amount)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn entries_for_child(
    pool: &SqlitePool,
    child_id: Uuid,
) -> sqlx::Result<Vec<LedgerEntryRow>> {
    sqlx::query_as::<_, LedgerEntryRow>(
        "SELECT id, child_id, kind, description, amount, created_at FROM ledger_entries \
         WHERE child_id = ? ORDER BY created_at DESC",
    )
    .bind(child_id)
    .fetch_all(pool)
    .await
}

/// Recompute the child's totals from scratch: pending previews from the
/// submission table, everything else from the ledger.
pub async fn balance_for(pool: &SqlitePool, child_id: Uuid) -> sqlx::Result<BalanceSummary> {
    let pending = submissions::pending_values(pool, child_id).await?;
    let entries: Vec<(EntryKind, f64)> =
        sqlx::query_as("SELECT kind, amount FROM ledger_entries WHERE child_id = ?")
            .bind(child_id)
            .fetch_all(pool)
            .await?;

    Ok(summarize(&pending, &entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, ChoreTypeSpec};
    use crate::submissions::{approve_submission, pending_submissions, submit_chore};
    use crate::testutil::{insert_child, memory_pool};
    use chrono::NaiveDate;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[tokio::test]
    async fn fine_and_payment_validation() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;

        assert!(matches!(
            add_fine(&pool, child, "  ", 5.0).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            add_fine(&pool, child, "Lost library book", 0.0).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            add_payment(&pool, child, -3.0).await,
            Err(Error::Validation(_))
        ));

        assert!(entries_for_child(&pool, child).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fine_plus_payment_without_earnings_goes_negative() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;

        add_fine(&pool, child, "Bad behavior", 5.0).await.unwrap();
        add_payment(&pool, child, 5.0).await.unwrap();

        let summary = balance_for(&pool, child).await.unwrap();
        assert!(close(summary.total_fines, 5.0));
        assert!(close(summary.total_payments, 5.0));
        assert!(close(summary.balance, -10.0));
    }

    #[tokio::test]
    async fn balance_round_trips_the_individual_entries() {
        let pool = memory_pool().await;
        let child = insert_child(&pool).await;
        let chore = catalog::create_chore_type(
            &pool,
            &ChoreTypeSpec {
                name: "Clean Room".to_string(),
                description: "everything off the floor".to_string(),
                value: 5.0,
                limits: [2; 7],
            },
        )
        .await
        .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        submit_chore(&pool, child, chore, 2, None, day).await.unwrap();
        for row in pending_submissions(&pool).await.unwrap() {
            approve_submission(&pool, row.id).await.unwrap();
        }
        add_fine(&pool, child, "Left bike outside", 2.0).await.unwrap();
        add_payment(&pool, child, 3.0).await.unwrap();

        let summary = balance_for(&pool, child).await.unwrap();
        assert!(close(summary.approved_earnings, 10.0));
        assert!(close(summary.balance, 5.0));

        let by_hand: f64 = entries_for_child(&pool, child)
            .await
            .unwrap()
            .iter()
            .map(LedgerEntryRow::signed_amount)
            .sum();
        assert!(close(summary.balance, by_hand));
    }
}
