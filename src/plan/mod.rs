mod page;

use axum::{Router, routing::get};

use crate::AppState;

/// How many of the newest chat messages the planning page shows.
pub const MINI_CHAT_LEN: u32 = 20;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plan", get(page::plan_event))
}
