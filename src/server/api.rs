//! JSON endpoints over the content loader

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use super::pages::BlogQuery;
use super::AppState;
use crate::content::ContentError;

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BlogQuery>,
) -> Response {
    match query.posts(&state.loader) {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => failure(e),
    }
}

pub async fn get_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match state.loader.get_by_slug(&slug) {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => post_not_found(),
        Err(e) => {
            tracing::warn!("Cannot load post {}: {}", slug, e);
            post_not_found()
        }
    }
}

pub async fn list_categories(State(state): State<Arc<AppState>>) -> Response {
    match state.loader.list_categories() {
        Ok(categories) => Json(categories).into_response(),
        Err(e) => failure(e),
    }
}

pub async fn list_tags(State(state): State<Arc<AppState>>) -> Response {
    match state.loader.list_tags() {
        Ok(tags) => Json(tags).into_response(),
        Err(e) => failure(e),
    }
}

fn post_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "Post not found" })),
    )
        .into_response()
}

fn failure(e: ContentError) -> Response {
    tracing::error!("Content listing failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": e.to_string() })),
    )
        .into_response()
}
