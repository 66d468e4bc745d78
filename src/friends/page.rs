use axum::{
    Form, debug_handler,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    AppError, AppResult, AppState, colors,
    db::{chats, friends},
    flash,
    forms::{self, FormFields, ValidationErrors},
    include_res,
    models::{Chat, Energy},
    res,
};

const DELETE_FRIEND: &str = "delete_friend_id";
const DELETE_MESSAGE: &str = "delete_message_id";
const SAVE_NEW: &str = "save_new";
const SAVE_ENERGY: &str = "save_energy";

#[debug_handler(state = AppState)]
pub(crate) async fn friends_page(
    State(db_pool): State<SqlitePool>,
    State(chat): State<Chat>,
    session: Session,
) -> AppResult<Response> {
    let notice = flash::take(&session).await?;
    render(&db_pool, &chat, PageState { notice, ..PageState::default() }).await
}

#[debug_handler(state = AppState)]
pub(crate) async fn friends_action(
    State(db_pool): State<SqlitePool>,
    State(chat): State<Chat>,
    session: Session,
    Form(fields): Form<FormFields>,
) -> AppResult<Response> {
    if let Some(raw_id) = fields.get(DELETE_FRIEND) {
        let id = forms::parse_id(DELETE_FRIEND, raw_id)?;
        if !friends::delete(&db_pool, id).await? {
            return Err(AppError::NotFound(format!("friend {id}")));
        }
        info!(friend_id = id, "friend deleted");
        flash::push(&session, "Friend removed.").await?;
        return Ok(back());
    }

    if let Some(raw_id) = fields.get(DELETE_MESSAGE) {
        let id = forms::parse_id(DELETE_MESSAGE, raw_id)?;
        if !chats::delete_message(&db_pool, id).await? {
            return Err(AppError::NotFound(format!("message {id}")));
        }
        info!(message_id = id, "message deleted");
        flash::push(&session, "Message deleted.").await?;
        return Ok(back());
    }

    if fields.contains(SAVE_NEW) {
        let name = fields.get("new-name");
        return match forms::validate_new_friend(name, fields.get("new-energy")) {
            Ok(new_friend) => {
                let friend = friends::insert(&db_pool, &new_friend).await?;
                info!(friend_id = friend.id, energy = %friend.energy, "friend added");
                flash::push(&session, format!("Added {}.", friend.name)).await?;
                Ok(back())
            }
            Err(errors) => {
                warn!(%errors, "new friend rejected");
                let new_name = name.unwrap_or_default().to_owned();
                render(&db_pool, &chat, PageState { errors, new_name, ..PageState::default() }).await
            }
        };
    }

    if fields.contains(SAVE_ENERGY) {
        let current = friends::list(&db_pool).await?;
        return match forms::validate_energy_updates(&fields, &current) {
            Ok(updates) => {
                friends::update_energies(&db_pool, &updates).await?;
                info!(updated = updates.len(), "energy levels saved");
                flash::push(&session, "Energy levels saved.").await?;
                Ok(back())
            }
            Err(errors) => {
                warn!(%errors, "energy update rejected");
                render(&db_pool, &chat, PageState { errors, ..PageState::default() }).await
            }
        };
    }

    Err(AppError::BadRequest("no friend action in form".to_owned()))
}

fn back() -> Response {
    Redirect::to("/friends").into_response()
}

#[derive(Default)]
struct PageState {
    notice: Option<String>,
    errors: ValidationErrors,
    new_name: String,
}

async fn render(db_pool: &SqlitePool, chat: &Chat, state: PageState) -> AppResult<Response> {
    let friends = friends::list(db_pool).await?;
    let messages = chats::messages(db_pool, chat.id).await?;

    let friend_rows: String = colors::assign_friend_colors(&friends)
        .into_iter()
        .map(|(friend, color)| {
            include_res!(str, "/pages/friends/friend_row.html")
                .replace("{id}", &friend.id.to_string())
                .replace("{color}", color)
                .replace("{name}", &res::escape(&friend.name))
                .replace("{energy_options}", &energy_options(friend.energy))
        })
        .collect();

    let message_rows: String = messages
        .iter()
        .map(|message| {
            include_res!(str, "/pages/friends/message_row.html")
                .replace("{id}", &message.id.to_string())
                .replace("{time}", &message.created_at.clock())
                .replace("{sender_name}", &res::escape(&message.sender_name))
                .replace("{text}", &res::escape(&message.text))
        })
        .collect();

    let status = if state.errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    let body = include_res!(str, "/pages/friends/page.html")
        .replace("{flash}", &flash::to_html(state.notice.as_deref()))
        .replace("{errors}", &errors_to_html(&state.errors))
        .replace("{new_name}", &res::escape(&state.new_name))
        .replace("{energy_options}", &energy_options(Energy::default()))
        .replace("{friend_rows}", &friend_rows)
        .replace("{messages}", &message_rows);

    Ok((status, Html(body)).into_response())
}

fn energy_options(selected: Energy) -> String {
    Energy::ALL
        .into_iter()
        .map(|energy| {
            let mark = if energy == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{mark}>{}</option>"#, energy.as_str(), energy.label())
        })
        .collect()
}

fn errors_to_html(errors: &ValidationErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|err| format!(r#"<li data-field="{}">{}</li>"#, res::escape(&err.field), res::escape(&err.message)))
        .collect();
    format!(r#"<ul class="errors">{items}</ul>"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_options_mark_the_current_level() {
        let html = energy_options(Energy::High);
        assert!(html.contains(r#"<option value="high" selected>High</option>"#));
        assert!(html.contains(r#"<option value="low">Low</option>"#));
    }

    #[test]
    fn errors_render_per_field() {
        let mut errors = ValidationErrors::default();
        errors.push("name", "This field is required.");
        assert_eq!(
            errors_to_html(&errors),
            r#"<ul class="errors"><li data-field="name">This field is required.</li></ul>"#
        );
        assert_eq!(errors_to_html(&ValidationErrors::default()), "");
    }
}
