use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use models::ArticleWithTags;
use serde::Deserialize;
use tracing::info;

use crate::errors::ApiError;
use crate::routes::{json_body, path_id};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tag_ids: Option<Vec<i32>>,
}

/// Validated article fields.
struct ArticleFields {
    title: String,
    content: String,
    tag_ids: Option<Vec<i32>>,
}

impl ArticleInput {
    fn into_fields(self) -> Result<ArticleFields, ApiError> {
        match (self.title, self.content) {
            (Some(title), Some(content)) if !title.trim().is_empty() && !content.trim().is_empty() => {
                Ok(ArticleFields { title, content, tag_ids: self.tag_ids })
            }
            _ => Err(ApiError::validation("Title and content are required")),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIdsInput {
    #[serde(default)]
    pub tag_ids: Option<Vec<i32>>,
}

impl TagIdsInput {
    fn into_ids(self) -> Result<Vec<i32>, ApiError> {
        self.tag_ids.ok_or_else(|| ApiError::validation("tagIds is required"))
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ArticleWithTags>>, ApiError> {
    let articles = state.articles.list().await?;
    info!(count = articles.len(), "list articles");
    Ok(Json(articles))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleWithTags>), ApiError> {
    let input = json_body(body)?.into_fields()?;
    let created = state
        .articles
        .create(&input.title, &input.content, input.tag_ids.as_deref())
        .await
        .map_err(|e| ApiError::service(e, state.expose_error_detail))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ArticleWithTags>, ApiError> {
    let id = path_id(id)?;
    state.articles.get(id).await?.map(Json).ok_or(ApiError::NotFound("Article not found"))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Json<ArticleWithTags>, ApiError> {
    let id = path_id(id)?;
    let input = json_body(body)?.into_fields()?;
    let updated = state
        .articles
        .update(id, &input.title, &input.content, input.tag_ids.as_deref())
        .await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = path_id(id)?;
    state.articles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_tags(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<TagIdsInput>, JsonRejection>,
) -> Result<Json<ArticleWithTags>, ApiError> {
    let id = path_id(id)?;
    let tag_ids = json_body(body)?.into_ids()?;
    Ok(Json(state.articles.add_tags(id, &tag_ids).await?))
}

/// Responds with `null` when the article no longer exists.
pub async fn remove_tags(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<TagIdsInput>, JsonRejection>,
) -> Result<Json<Option<ArticleWithTags>>, ApiError> {
    let id = path_id(id)?;
    let tag_ids = json_body(body)?.into_ids()?;
    Ok(Json(state.articles.remove_tags(id, &tag_ids).await?))
}
