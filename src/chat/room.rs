use axum::{
    Form, debug_handler,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{
    AppError, AppResult, AppState, colors,
    db::{chats, friends},
    forms::{self, ChatForm, ChatPost},
    include_res,
    models::{Chat, Timestamp},
    res,
};

use super::msg;

#[debug_handler(state = AppState)]
pub(crate) async fn chat_room(
    State(db_pool): State<SqlitePool>,
    State(chat): State<Chat>,
) -> AppResult<Response> {
    let friends = friends::list(&db_pool).await?;
    let messages = chats::messages(&db_pool, chat.id).await?;
    debug!(chat_id = chat.id, messages = messages.len(), "rendering chat room");

    let colors = colors::color_map(&friends);
    let legend: String = colors::assign_friend_colors(&friends)
        .into_iter()
        .map(|(friend, color)| format!(r#"<li style="color: {color}">{}</li>"#, res::escape(&friend.name)))
        .collect();
    let messages: String = messages
        .iter()
        .map(|message| msg::message_to_html(message, &colors))
        .collect();

    let body = include_res!(str, "/pages/chat/room.html")
        .replace("{room_name}", &res::escape(&chat.name))
        .replace("{legend}", &legend)
        .replace("{sender_options}", &msg::sender_options(&friends))
        .replace("{messages}", &messages);

    Ok(Html(body).into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn post_message(
    State(db_pool): State<SqlitePool>,
    State(chat): State<Chat>,
    Form(form): Form<ChatForm>,
) -> AppResult<Redirect> {
    match forms::validate_chat_post(&form)? {
        ChatPost::Empty => {
            debug!("ignoring chat post without sender or text");
        }
        ChatPost::Message { sender_id, text } => {
            let Some(sender) = friends::get(&db_pool, sender_id).await? else {
                return Err(AppError::NotFound(format!("friend {sender_id}")));
            };

            let id = chats::insert_message(&db_pool, chat.id, sender.id, &text, Timestamp::now()).await?;
            info!(message_id = id, sender_id = sender.id, "message posted");
        }
    }

    Ok(Redirect::to("/chat"))
}
