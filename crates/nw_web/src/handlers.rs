use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use nw_core::{Article, PLACEHOLDER_IMAGE};
use serde_json::json;
use thiserror::Error;

use crate::render;
use crate::AppState;

/// Served at [`PLACEHOLDER_IMAGE`] when the static dir has no file of its own.
pub const PLACEHOLDER_JPEG: &[u8] = include_bytes!("../assets/placeholder.jpg");

#[derive(Error, Debug)]
pub enum WebError {
    #[error("No article with id {0}")]
    NotFound(u32),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NotFound(id) => {
                (StatusCode::NOT_FOUND, Html(render::not_found_page(id))).into_response()
            }
        }
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let articles = state.articles().await;
    Html(render::index_page(&articles))
}

pub async fn article_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Html<String>, WebError> {
    let article = state.article(id).await.ok_or(WebError::NotFound(id))?;
    Ok(Html(render::article_page(&article)))
}

pub async fn list_articles(State(state): State<Arc<AppState>>) -> Json<Vec<Article>> {
    Json(state.articles().await)
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Response {
    match state.article(id).await {
        Some(article) => Json(article).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": WebError::NotFound(id).to_string() })),
        )
            .into_response(),
    }
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Fallback for `/static` misses.
pub async fn static_fallback(OriginalUri(uri): OriginalUri) -> Response {
    if uri.path() == PLACEHOLDER_IMAGE {
        ([(header::CONTENT_TYPE, "image/jpeg")], PLACEHOLDER_JPEG).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
