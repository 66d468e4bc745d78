mod msg;
mod room;

use axum::{Router, routing::get};

use crate::AppState;

pub(crate) use msg::message_to_html;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chat", get(room::chat_room).post(room::post_message))
}
