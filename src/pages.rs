use axum::{Router, debug_handler, response::{Html, IntoResponse}, routing::get};

use crate::{AppState, include_res, res::Markdown};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/crew", get(crew_live))
        .route("/projects", get(projects))
}

#[debug_handler]
pub async fn home() -> impl IntoResponse {
    Html(include_res!(str, "/pages/index.html"))
}

#[debug_handler]
pub async fn crew_live() -> impl IntoResponse {
    Html(include_res!(str, "/pages/crew.html"))
}

#[debug_handler]
pub async fn projects() -> impl IntoResponse {
    Markdown(include_res!(str, "/pages/projects.md"))
}
