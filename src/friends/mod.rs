mod page;

use axum::{Router, routing::get};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/friends", get(page::friends_page).post(page::friends_action))
}
