pub mod appresult;
pub mod carpools;
pub mod chat;
pub mod colors;
pub mod config;
pub mod db;
pub mod flash;
pub mod forms;
pub mod friends;
pub mod models;
pub mod pages;
pub mod plan;
pub mod res;

use axum::{Router, extract::FromRef};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};
use tracing::info;

pub use appresult::{ApiError, ApiResult, AppError, AppResult};
pub use config::Config;

use models::Chat;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
    /// The shared room every chat handler reads and writes.
    pub chat: Chat,
}

impl AppState {
    /// Opens the database, applies migrations and resolves the configured chat room.
    pub async fn init(config: Config) -> anyhow::Result<AppState> {
        let db_pool = db::connect(&config).await?;
        AppState::with_pool(db_pool, config).await
    }

    pub async fn with_pool(db_pool: SqlitePool, config: Config) -> anyhow::Result<AppState> {
        let chat = db::chats::get_or_create(&db_pool, &config.chat_room).await?;
        info!(chat_id = chat.id, room = %chat.name, "chat room ready");

        Ok(AppState { db_pool, config, chat })
    }
}

pub fn app(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(30)));

    Router::new()
        .merge(pages::router())
        .merge(chat::router())
        .merge(friends::router())
        .merge(plan::router())
        .nest("/api", carpools::router())

        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}
