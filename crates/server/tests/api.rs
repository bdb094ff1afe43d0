use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::{DatabaseConfig, Environment};
use serde_json::{json, Value};
use service::article::{repository::mock::UnavailableArticleRepository, ArticleService};
use service::tag::{repository::mock::UnavailableTagRepository, TagService};
use tower::ServiceExt;

use server::state::AppState;

async fn build_app(environment: Environment) -> anyhow::Result<Router> {
    let db = models::db::connect_with_config(&DatabaseConfig::for_url("sqlite::memory:")).await?;
    models::db::migrate(&db).await?;
    Ok(server::app(AppState::from_db(db, environment)))
}

fn unavailable_app(environment: Environment) -> Router {
    let tags = TagService::new(Arc::new(UnavailableTagRepository));
    let articles = ArticleService::new(Arc::new(UnavailableArticleRepository));
    server::app(AppState::new(tags, articles, environment))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

fn tag_ids(article: &Value) -> Vec<i64> {
    article["article_tags"]
        .as_array()
        .map(|links| links.iter().filter_map(|l| l["tag_id"].as_i64()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;
    let (status, body) = send(&app, "GET", "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    Ok(())
}

#[tokio::test]
async fn tag_and_article_walkthrough() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;

    let (status, tag) = send(&app, "POST", "/tags", Some(json!({ "name": "go" }))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tag["id"], 1);
    assert_eq!(tag["name"], "go");

    let (status, article) = send(
        &app,
        "POST",
        "/articles",
        Some(json!({ "title": "A", "content": "B", "tagIds": [1] })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(article["title"], "A");
    assert_eq!(tag_ids(&article), vec![1]);
    assert_eq!(article["article_tags"][0]["tag"]["name"], "go");

    let (status, listed) = send(&app, "GET", "/tags/1/articles", None).await?;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().cloned().unwrap_or_default();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], article["id"]);

    let (status, body) = send(&app, "DELETE", "/tags/1", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "POST", "/articles", Some(json!({ "title": "", "content": "x" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Title and content are required" }));
    Ok(())
}

#[tokio::test]
async fn tag_crud_over_http() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;
    send(&app, "POST", "/tags", Some(json!({ "name": "rust" }))).await?;
    send(&app, "POST", "/tags", Some(json!({ "name": "db" }))).await?;

    let (status, tags) = send(&app, "GET", "/tags", None).await?;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = tags.as_array().into_iter().flatten().map(|t| t["name"].clone()).collect();
    assert_eq!(names, vec![json!("rust"), json!("db")]);

    let (status, renamed) = send(&app, "PUT", "/tags/2", Some(json!({ "name": "sql" }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "sql");

    let (status, fetched) = send(&app, "GET", "/tags/2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "sql");

    let (status, body) = send(&app, "PUT", "/tags/2", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required");

    let (status, body) = send(&app, "POST", "/tags", Some(json!({ "name": "  " }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Name is required");
    Ok(())
}

#[tokio::test]
async fn missing_records_return_not_found() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;

    let (status, body) = send(&app, "GET", "/tags/42", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Tag not found" }));

    let (status, body) = send(&app, "GET", "/articles/42", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Article not found" }));

    let (status, body) = send(&app, "GET", "/tags/42/articles", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn mutating_missing_records_is_internal_error() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;

    let (status, body) = send(&app, "DELETE", "/articles/9", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal Server Error" }));

    let (status, _) = send(&app, "DELETE", "/tags/9", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, "PUT", "/tags/9", Some(json!({ "name": "x" }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, "PUT", "/articles/9", Some(json!({ "title": "t", "content": "c" }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, "PUT", "/articles/9/tags", Some(json!({ "tagIds": [1] }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn rejects_bad_ids_and_bodies() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;

    let (status, body) = send(&app, "GET", "/articles/abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Invalid id" }));

    let (status, _) = send(&app, "DELETE", "/tags/1.5", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let req = Request::builder()
        .method("POST")
        .uri("/tags")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["message"], "Invalid request body");

    let (status, body) = send(&app, "PUT", "/articles/1/tags", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "tagIds is required");

    let (status, body) = send(&app, "PUT", "/articles/1", Some(json!({ "title": "only" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Title and content are required");
    Ok(())
}

#[tokio::test]
async fn article_tag_management() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;
    for name in ["a", "b", "c"] {
        send(&app, "POST", "/tags", Some(json!({ "name": name }))).await?;
    }

    let (_, article) = send(
        &app,
        "POST",
        "/articles",
        Some(json!({ "title": "T", "content": "C", "tagIds": [2, 1, 2] })),
    )
    .await?;
    assert_eq!(tag_ids(&article), vec![1, 2]);
    let id = article["id"].as_i64().unwrap_or_default();

    let (status, added) = send(&app, "PUT", &format!("/articles/{id}/tags"), Some(json!({ "tagIds": [3, 1] }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag_ids(&added), vec![1, 2, 3]);

    let (_, again) = send(&app, "PUT", &format!("/articles/{id}/tags"), Some(json!({ "tagIds": [3] }))).await?;
    assert_eq!(tag_ids(&again), vec![1, 2, 3]);

    let (status, removed) = send(&app, "DELETE", &format!("/articles/{id}/tags"), Some(json!({ "tagIds": [1, 3] }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag_ids(&removed), vec![2]);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/articles/{id}"),
        Some(json!({ "title": "T2", "content": "C2", "tagIds": [] })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "T2");
    assert!(tag_ids(&updated).is_empty());

    let (status, _) = send(&app, "DELETE", &format!("/articles/{id}"), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, gone) = send(&app, "DELETE", &format!("/articles/{id}/tags"), Some(json!({ "tagIds": [2] }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(gone, Value::Null);

    let (_, all) = send(&app, "GET", "/articles", None).await?;
    assert_eq!(all, json!([]));
    Ok(())
}

#[tokio::test]
async fn unknown_tag_id_fails_article_create() -> anyhow::Result<()> {
    let app = build_app(Environment::Production).await?;
    let (status, body) = send(
        &app,
        "POST",
        "/articles",
        Some(json!({ "title": "T", "content": "C", "tagIds": [77] })),
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal Server Error" }));

    let (_, all) = send(&app, "GET", "/articles", None).await?;
    assert_eq!(all, json!([]));
    Ok(())
}

#[tokio::test]
async fn development_exposes_detail_on_create_only() -> anyhow::Result<()> {
    let app = unavailable_app(Environment::Development);

    let (status, body) = send(&app, "POST", "/tags", Some(json!({ "name": "go" }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal Server Error");
    assert!(body["error"].as_str().is_some_and(|e| e.contains("database unavailable")));

    let (status, body) = send(&app, "POST", "/articles", Some(json!({ "title": "t", "content": "c" }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/tags", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal Server Error" }));
    Ok(())
}

#[tokio::test]
async fn production_hides_error_detail() -> anyhow::Result<()> {
    let app = unavailable_app(Environment::Production);

    let (status, body) = send(&app, "POST", "/articles", Some(json!({ "title": "t", "content": "c" }))).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal Server Error" }));

    let (status, body) = send(&app, "GET", "/articles/1", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "Internal Server Error" }));
    Ok(())
}
