use std::collections::HashMap;

use sqlx::{FromRow, SqliteExecutor, SqlitePool};

use crate::models::{Carpool, Energy, Friend};

const SQL_SELECT_EVENT_CARPOOLS: &str = r#"
SELECT c.id, c.event_id, c.seats,
       f.id AS driver_id, f.name AS driver_name, f.energy AS driver_energy, f.event_id AS driver_event_id
FROM carpools c
JOIN friends f ON f.id = c.driver_id
WHERE c.event_id = ?1
ORDER BY c.id
"#;

const SQL_SELECT_EVENT_RIDERS: &str = r#"
SELECT r.carpool_id, f.id, f.name, f.energy, f.event_id
FROM carpool_riders r
JOIN carpools c ON c.id = r.carpool_id
JOIN friends f ON f.id = r.friend_id
WHERE c.event_id = ?1
ORDER BY r.carpool_id, r.id
"#;

const SQL_INSERT_RIDER_IF_ABSENT: &str = r#"
INSERT INTO carpool_riders (carpool_id, friend_id) VALUES (?1, ?2)
ON CONFLICT (carpool_id, friend_id) DO NOTHING
"#;

#[derive(FromRow)]
struct CarpoolRow {
    id: i64,
    event_id: i64,
    seats: i64,
    driver_id: i64,
    driver_name: String,
    driver_energy: Energy,
    driver_event_id: Option<i64>,
}

#[derive(FromRow)]
struct RiderRow {
    carpool_id: i64,
    #[sqlx(flatten)]
    friend: Friend,
}

pub async fn create(db_pool: &SqlitePool, event_id: i64, driver_id: i64, seats: u32) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO carpools (event_id, driver_id, seats) VALUES (?1, ?2, ?3)")
        .bind(event_id)
        .bind(driver_id)
        .bind(seats)
        .execute(db_pool)
        .await?;
    Ok(result.last_insert_rowid())
}

pub async fn exists<'e>(executor: impl SqliteExecutor<'e>, id: i64) -> sqlx::Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM carpools WHERE id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

/// All carpools of an event with driver and riders loaded, in creation order.
/// Riders are listed in the order they joined.
pub async fn for_event(db_pool: &SqlitePool, event_id: i64) -> sqlx::Result<Vec<Carpool>> {
    let carpools: Vec<CarpoolRow> = sqlx::query_as(SQL_SELECT_EVENT_CARPOOLS)
        .bind(event_id)
        .fetch_all(db_pool)
        .await?;
    let riders: Vec<RiderRow> = sqlx::query_as(SQL_SELECT_EVENT_RIDERS)
        .bind(event_id)
        .fetch_all(db_pool)
        .await?;

    let mut riders_by_carpool: HashMap<i64, Vec<Friend>> = HashMap::new();
    for RiderRow { carpool_id, friend } in riders {
        riders_by_carpool.entry(carpool_id).or_default().push(friend);
    }

    Ok(carpools
        .into_iter()
        .map(|row| Carpool {
            id: row.id,
            event_id: row.event_id,
            seats: row.seats,
            driver: Friend {
                id: row.driver_id,
                name: row.driver_name,
                energy: row.driver_energy,
                event_id: row.driver_event_id,
            },
            riders: riders_by_carpool.remove(&row.id).unwrap_or_default(),
        })
        .collect())
}

pub async fn rider_ids<'e>(executor: impl SqliteExecutor<'e>, carpool_id: i64) -> sqlx::Result<Vec<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT friend_id FROM carpool_riders WHERE carpool_id = ?1 ORDER BY id")
        .bind(carpool_id)
        .fetch_all(executor)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Adds a rider unless they are already in the carpool. Returns whether a row was written.
pub async fn add_rider<'e>(executor: impl SqliteExecutor<'e>, carpool_id: i64, friend_id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query(SQL_INSERT_RIDER_IF_ABSENT)
        .bind(carpool_id)
        .bind(friend_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_rider<'e>(executor: impl SqliteExecutor<'e>, carpool_id: i64, friend_id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM carpool_riders WHERE carpool_id = ?1 AND friend_id = ?2")
        .bind(carpool_id)
        .bind(friend_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
