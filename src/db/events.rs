use sqlx::SqlitePool;

use crate::models::{Event, EventType, Timestamp};

const SQL_INSERT_EVENT_IF_ABSENT: &str = r#"
INSERT INTO events (name, trip_id, event_type, start_time, location_name, location_notes, created_at)
VALUES (?1, ?2, ?3, ?4, '', '', ?4)
ON CONFLICT (trip_id) DO NOTHING
"#;

const SQL_SELECT_EVENT_BY_SLUG: &str = r#"
SELECT id, name, trip_id, event_type, start_time, location_name, location_notes, created_at
FROM events
WHERE trip_id = ?1
"#;

/// Returns the event with `trip_id`, creating it with `name` first if needed.
/// An existing event keeps its name.
pub async fn get_or_create_by_slug(
    db_pool: &SqlitePool,
    trip_id: &str,
    name: &str,
) -> sqlx::Result<Event> {
    let now = Timestamp::now();
    let created = sqlx::query(SQL_INSERT_EVENT_IF_ABSENT)
        .bind(name)
        .bind(trip_id)
        .bind(EventType::Trip)
        .bind(now)
        .execute(db_pool)
        .await?;
    if created.rows_affected() > 0 {
        tracing::info!(trip_id, name, "created event");
    }

    sqlx::query_as(SQL_SELECT_EVENT_BY_SLUG)
        .bind(trip_id)
        .fetch_one(db_pool)
        .await
}
