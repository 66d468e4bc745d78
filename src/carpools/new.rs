use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    ApiResult, AppError, AppState, Config,
    db::{carpools, events, friends},
};

const DEFAULT_SEATS: u32 = 4;

#[derive(Debug, Deserialize)]
pub(crate) struct NewCarpoolRequest {
    driver_id: i64,
    #[serde(default = "default_seats")]
    seats: u32,
}

fn default_seats() -> u32 {
    DEFAULT_SEATS
}

#[derive(Debug, Serialize)]
pub(crate) struct NewCarpoolResponse {
    status: &'static str,
    carpool_id: i64,
}

/// Adds a carpool driven by `driver_id` to the configured event.
#[debug_handler(state = AppState)]
pub(crate) async fn create_carpool(
    State(db_pool): State<SqlitePool>,
    State(config): State<Config>,
    payload: Result<Json<NewCarpoolRequest>, JsonRejection>,
) -> ApiResult<Json<NewCarpoolResponse>> {
    let Json(NewCarpoolRequest { driver_id, seats }) =
        payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    if friends::get(&db_pool, driver_id).await?.is_none() {
        return Err(AppError::NotFound(format!("friend {driver_id}")).into());
    }
    let event = events::get_or_create_by_slug(&db_pool, &config.event_slug, &config.event_name).await?;
    let carpool_id = carpools::create(&db_pool, event.id, driver_id, seats).await?;
    info!(carpool_id, driver_id, seats, event_id = event.id, "carpool created");

    Ok(Json(NewCarpoolResponse { status: "ok", carpool_id }))
}
