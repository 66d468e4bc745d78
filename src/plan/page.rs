use std::collections::HashMap;

use axum::{
    debug_handler,
    extract::State,
    response::{Html, IntoResponse, Response},
};
use sqlx::SqlitePool;
use tracing::debug;

use crate::{
    AppResult, AppState, Config,
    chat::message_to_html,
    colors::{self, FALLBACK_COLOR},
    db::{carpools, chats, events, friends},
    include_res,
    models::{Carpool, Chat},
    res,
};

use super::MINI_CHAT_LEN;

#[debug_handler(state = AppState)]
pub(crate) async fn plan_event(
    State(db_pool): State<SqlitePool>,
    State(config): State<Config>,
    State(chat): State<Chat>,
) -> AppResult<Response> {
    let event = events::get_or_create_by_slug(&db_pool, &config.event_slug, &config.event_name).await?;
    let friends = friends::list(&db_pool).await?;
    let carpools = carpools::for_event(&db_pool, event.id).await?;
    let messages = chats::recent_messages(&db_pool, chat.id, MINI_CHAT_LEN).await?;
    let message_count = chats::count_messages(&db_pool, chat.id).await?;
    debug!(event_id = event.id, carpools = carpools.len(), "rendering plan page");

    let colors = colors::color_map(&friends);
    let friend_items: String = colors::assign_friend_colors(&friends)
        .into_iter()
        .map(|(friend, color)| {
            format!(
                r#"<li data-friend-id="{}" style="color: {color}">{} <small>{}</small></li>"#,
                friend.id,
                res::escape(&friend.name),
                friend.energy.label(),
            )
        })
        .collect();
    let carpool_sections: String = carpools
        .iter()
        .map(|carpool| carpool_to_html(carpool, &colors))
        .collect();
    let messages: String = messages
        .iter()
        .map(|message| message_to_html(message, &colors))
        .collect();

    let start = event.start_time.to_datetime();
    let start_time = format!(
        "{} {:02}:{:02}",
        start.date(),
        start.hour(),
        start.minute()
    );

    let location = match (event.location_name.as_str(), event.location_notes.as_str()) {
        ("", "") => String::new(),
        (name, "") => format!("<p>{}</p>", res::escape(name)),
        (name, notes) => format!("<p>{}</p><p>{}</p>", res::escape(name), res::escape(notes)),
    };

    let body = include_res!(str, "/pages/plan/page.html")
        .replace("{event_name}", &res::escape(&event.name))
        .replace("{event_type}", event.event_type.label())
        .replace("{start_time}", &start_time)
        .replace("{location}", &location)
        .replace("{friends}", &friend_items)
        .replace("{carpools}", &carpool_sections)
        .replace("{message_count}", &message_count.to_string())
        .replace("{messages}", &messages);

    Ok(Html(body).into_response())
}

fn carpool_to_html(carpool: &Carpool, colors: &HashMap<i64, &str>) -> String {
    let color_of = |id: i64| colors.get(&id).copied().unwrap_or(FALLBACK_COLOR);
    let riders: String = carpool
        .riders
        .iter()
        .map(|rider| {
            format!(
                r#"<li data-friend-id="{}" style="color: {}">{}</li>"#,
                rider.id,
                color_of(rider.id),
                res::escape(&rider.name)
            )
        })
        .collect();

    include_res!(str, "/pages/plan/carpool.html")
        .replace("{id}", &carpool.id.to_string())
        .replace("{driver_color}", color_of(carpool.driver.id))
        .replace("{driver_name}", &res::escape(&carpool.driver.name))
        .replace("{seats}", &carpool.seats.to_string())
        .replace("{open_seats}", &carpool.open_seats().to_string())
        .replace("{riders}", &riders)
}
