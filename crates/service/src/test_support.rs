#![cfg(test)]
use std::sync::Arc;

use configs::DatabaseConfig;
use models::db::{connect_with_config, migrate};
use sea_orm::DatabaseConnection;

use crate::article::{repository::SeaOrmArticleRepository, ArticleService};
use crate::tag::{repository::SeaOrmTagRepository, TagService};

/// Fresh in-memory database per test, fully migrated.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::for_url("sqlite::memory:")).await?;
    migrate(&db).await?;
    Ok(db)
}

pub async fn tag_service() -> Result<(TagService, DatabaseConnection), anyhow::Error> {
    let db = get_db().await?;
    let svc = TagService::new(Arc::new(SeaOrmTagRepository { db: db.clone() }));
    Ok((svc, db))
}

/// Both services over one database, tags first.
pub async fn article_service() -> Result<(TagService, ArticleService, DatabaseConnection), anyhow::Error> {
    let db = get_db().await?;
    let tags = TagService::new(Arc::new(SeaOrmTagRepository { db: db.clone() }));
    let articles = ArticleService::new(Arc::new(SeaOrmArticleRepository { db: db.clone() }));
    Ok((tags, articles, db))
}
