//! One-shot notices carried across a post/redirect/get in the session.

use tower_sessions::Session;

use crate::{AppResult, res};

const FLASH: &str = "flash";

pub async fn push(session: &Session, notice: impl Into<String>) -> AppResult<()> {
    let notice: String = notice.into();
    session.insert(FLASH, notice).await?;
    Ok(())
}

pub async fn take(session: &Session) -> AppResult<Option<String>> {
    Ok(session.remove::<String>(FLASH).await?)
}

/// The notice as page markup, or nothing.
pub fn to_html(notice: Option<&str>) -> String {
    match notice {
        Some(notice) => format!(r#"<p class="flash">{}</p>"#, res::escape(notice)),
        None => String::new(),
    }
}
