use std::collections::BTreeSet;

use axum::{Json, debug_handler, extract::{State, rejection::JsonRejection}};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

use crate::{
    ApiResult, AppError, AppResult,
    db::{carpools, friends},
};

/// Body of `POST /api/carpools/riders`. `friend_ids` is the only accepted key.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateRidersRequest {
    carpool_id: i64,
    friend_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateRidersResponse {
    status: &'static str,
    added: usize,
    removed: usize,
}

/// What a reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    pub added: Vec<i64>,
    pub removed: Vec<i64>,
}

#[debug_handler(state = crate::AppState)]
pub(crate) async fn update_carpool_riders(
    State(db_pool): State<SqlitePool>,
    payload: Result<Json<UpdateRidersRequest>, JsonRejection>,
) -> ApiResult<Json<UpdateRidersResponse>> {
    let Json(UpdateRidersRequest { carpool_id, friend_ids }) =
        payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let Reconciled { added, removed } = reconcile_riders(&db_pool, carpool_id, &friend_ids).await?;

    Ok(Json(UpdateRidersResponse {
        status: "ok",
        added: added.len(),
        removed: removed.len(),
    }))
}

/// Makes the carpool's riders exactly `friend_ids`.
///
/// Riders outside the set are removed and missing ones added; riders already
/// in the set are left alone. Runs in one transaction, so an unknown carpool
/// or friend leaves the table untouched.
pub async fn reconcile_riders(db_pool: &SqlitePool, carpool_id: i64, friend_ids: &[i64]) -> AppResult<Reconciled> {
    let target: BTreeSet<i64> = friend_ids.iter().copied().collect();

    let mut tx = db_pool.begin().await?;

    if !carpools::exists(&mut *tx, carpool_id).await? {
        return Err(AppError::NotFound(format!("carpool {carpool_id}")));
    }
    for &friend_id in &target {
        if friends::get(&mut *tx, friend_id).await?.is_none() {
            return Err(AppError::NotFound(format!("friend {friend_id}")));
        }
    }

    let current: BTreeSet<i64> = carpools::rider_ids(&mut *tx, carpool_id).await?.into_iter().collect();
    let removed: Vec<i64> = current.difference(&target).copied().collect();
    let added: Vec<i64> = target.difference(&current).copied().collect();

    for &friend_id in &removed {
        carpools::remove_rider(&mut *tx, carpool_id, friend_id).await?;
    }
    for &friend_id in &added {
        carpools::add_rider(&mut *tx, carpool_id, friend_id).await?;
    }

    tx.commit().await?;
    info!(carpool_id, ?added, ?removed, "carpool riders reconciled");

    Ok(Reconciled { added, removed })
}
