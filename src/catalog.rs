use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::{DayLimits, Error, limits::DAYS_PER_WEEK};

/// A parent-authored chore template. `value` is what one approved completion
/// pays; the seven limit columns cap submissions per weekday (0 = not
/// available that day).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChoreTypeRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub value: f64,
    pub sunday_limit: i64,
    pub monday_limit: i64,
    pub tuesday_limit: i64,
    pub wednesday_limit: i64,
    pub thursday_limit: i64,
    pub friday_limit: i64,
    pub saturday_limit: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ChoreTypeRow {
    pub fn limits(&self) -> DayLimits {
        DayLimits::new([
            self.sunday_limit,
            self.monday_limit,
            self.tuesday_limit,
            self.wednesday_limit,
            self.thursday_limit,
            self.friday_limit,
            self.saturday_limit,
        ])
    }
}

/// Validated input for creating or editing a chore type.
#[derive(Debug, Clone)]
pub struct ChoreTypeSpec {
    pub name: String,
    pub description: String,
    pub value: f64,
    pub limits: [i64; DAYS_PER_WEEK],
}

impl ChoreTypeSpec {
    fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("chore name is required"));
        }
        if self.description.trim().is_empty() {
            return Err(Error::validation("chore description is required"));
        }
        if !(self.value.is_finite() && self.value > 0.0) {
            return Err(Error::validation("chore value must be above zero"));
        }
        if self.limits.iter().any(|&limit| limit < 0) {
            return Err(Error::validation("daily limits cannot be negative"));
        }
        Ok(())
    }
}

pub async fn create_chore_type(pool: &SqlitePool, spec: &ChoreTypeSpec) -> Result<Uuid, Error> {
    spec.validate()?;

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO chore_types (id, name, description, value, sunday_limit, monday_limit, \
         tuesday_limit, wednesday_limit, thursday_limit, friday_limit, saturday_limit, active, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(spec.name.trim())
    .bind(spec.description.trim())
    .bind(spec.value)
    .bind(spec.limits[0])
    .bind(spec.limits[1])
    .bind(spec.limits[2])
    .bind(spec.limits[3])
    .bind(spec.limits[4])
    .bind(spec.limits[5])
    .bind(spec.limits[6])
    .bind(true)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn update_chore_type(
    pool: &SqlitePool,
    id: Uuid,
    spec: &ChoreTypeSpec,
) -> Result<(), Error> {
    spec.validate()?;

    let result = sqlx::query(
        "UPDATE chore_types SET name = ?, description = ?, value = ?, sunday_limit = ?, \
         monday_limit = ?, tuesday_limit = ?, wednesday_limit = ?, thursday_limit = ?, \
         friday_limit = ?, saturday_limit = ? WHERE id = ?",
    )
    .bind(spec.name.trim())
    .bind(spec.description.trim())
    .bind(spec.value)
    .bind(spec.limits[0])
    .bind(spec.limits[1])
    .bind(spec.limits[2])
    .bind(spec.limits[3])
    .bind(spec.limits[4])
    .bind(spec.limits[5])
    .bind(spec.limits[6])
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("chore type"));
    }
    Ok(())
}

/// Chore types are never deleted; deactivation hides them from the child
/// while historical submissions keep pointing at them.
pub async fn set_chore_type_active(
    pool: &SqlitePool,
    id: Uuid,
    active: bool,
) -> Result<(), Error> {
    let result = sqlx::query("UPDATE chore_types SET active = ? WHERE id = ?")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound("chore type"));
    }
    Ok(())
}

pub async fn list_chore_types(
    pool: &SqlitePool,
    active_only: bool,
) -> sqlx::Result<Vec<ChoreTypeRow>> {
    let sql = if active_only {
        "SELECT * FROM chore_types WHERE active = 1 ORDER BY name"
    } else {
        "SELECT * FROM chore_types ORDER BY name"
    };
    sqlx::query_as::<_, ChoreTypeRow>(sql).fetch_all(pool).await
}

pub async fn fetch_chore_type(pool: &SqlitePool, id: Uuid) -> Result<ChoreTypeRow, Error> {
    sqlx::query_as::<_, ChoreTypeRow>("SELECT * FROM chore_types WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::NotFound("chore type"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::memory_pool;

    fn spec(name: &str, value: f64) -> ChoreTypeSpec {
        ChoreTypeSpec {
            name: name.to_string(),
            description: format!("{name} description"),
            value,
            limits: [1; DAYS_PER_WEEK],
        }
    }

    #[tokio::test]
    async fn create_and_fetch_round_trip() {
        let pool = memory_pool().await;

        let mut wanted = spec("Clean Room", 5.0);
        wanted.limits = [1, 0, 2, 0, 0, 0, 0];
        let id = create_chore_type(&pool, &wanted).await.unwrap();

        let row = fetch_chore_type(&pool, id).await.unwrap();
        assert_eq!(row.name, "Clean Room");
        assert!(row.active);
        assert_eq!(row.limits().day_abbreviations(), "ST");
        assert_eq!(row.tuesday_limit, 2);
    }

    #[tokio::test]
    async fn rejects_invalid_specs() {
        let pool = memory_pool().await;

        let no_name = spec("   ", 5.0);
        assert!(matches!(
            create_chore_type(&pool, &no_name).await,
            Err(Error::Validation(_))
        ));

        let free = spec("Free", 0.0);
        assert!(matches!(
            create_chore_type(&pool, &free).await,
            Err(Error::Validation(_))
        ));

        let mut negative_limit = spec("Bad Limits", 2.0);
        negative_limit.limits[3] = -1;
        assert!(matches!(
            create_chore_type(&pool, &negative_limit).await,
            Err(Error::Validation(_))
        ));

        assert!(list_chore_types(&pool, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deactivation_hides_from_active_list_only() {
        let pool = memory_pool().await;

        let dishes = create_chore_type(&pool, &spec("Dishes", 1.5)).await.unwrap();
        create_chore_type(&pool, &spec("Vacuum", 3.0)).await.unwrap();

        set_chore_type_active(&pool, dishes, false).await.unwrap();

        let active = list_chore_types(&pool, true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Vacuum");

        let all = list_chore_types(&pool, false).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_checks_existence() {
        let pool = memory_pool().await;

        let id = create_chore_type(&pool, &spec("Trash", 2.0)).await.unwrap();

        let mut edited = spec("Take Out Trash", 2.5);
        edited.limits = [1, 0, 0, 1, 0, 0, 0];
        update_chore_type(&pool, id, &edited).await.unwrap();

        let row = fetch_chore_type(&pool, id).await.unwrap();
        assert_eq!(row.name, "Take Out Trash");
        assert_eq!(row.value, 2.5);
        assert_eq!(row.limits().day_abbreviations(), "SW");

        assert!(matches!(
            update_chore_type(&pool, Uuid::new_v4(), &edited).await,
            Err(Error::NotFound(_))
        ));
    }
}
