mod new;
mod riders;

use axum::{Router, routing::post};

use crate::AppState;

pub use riders::{Reconciled, reconcile_riders};

/// Routes under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/carpools", post(new::create_carpool))
        .route("/carpools/riders", post(riders::update_carpool_riders))
}
