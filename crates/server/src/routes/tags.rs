use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::{tag, ArticleWithTags};
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiError;
use crate::routes::{json_body, path_id};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TagInput {
    #[serde(default)]
    pub name: Option<String>,
}

impl TagInput {
    fn into_name(self) -> Result<String, ApiError> {
        match self.name {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ApiError::validation("Name is required")),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<tag::Model>>, ApiError> {
    let tags = state.tags.list().await?;
    info!(count = tags.len(), "list tags");
    Ok(Json(tags))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<TagInput>, JsonRejection>,
) -> Result<(StatusCode, Json<tag::Model>), ApiError> {
    let name = json_body(body)?.into_name()?;
    let created = state
        .tags
        .create(&name)
        .await
        .map_err(|e| ApiError::service(e, state.expose_error_detail))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<tag::Model>, ApiError> {
    let id = path_id(id)?;
    state.tags.get(id).await?.map(Json).ok_or(ApiError::NotFound("Tag not found"))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<TagInput>, JsonRejection>,
) -> Result<Json<tag::Model>, ApiError> {
    let id = path_id(id)?;
    let name = json_body(body)?.into_name()?;
    Ok(Json(state.tags.update(id, &name).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    state.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_articles(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Vec<ArticleWithTags>>, ApiError> {
    let tag_id = path_id(id)?;
    let articles = state.tags.list_articles(tag_id).await?;
    info!(tag_id, count = articles.len(), "list articles by tag");
    Ok(Json(articles))
}
