use std::collections::BTreeSet;

use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};

use crate::article_tag;
use crate::db::{connect_with_config, migrate};



/// Fresh in-memory database with the full schema applied.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = connect_with_config(&DatabaseConfig::for_url("sqlite::memory:")).await?;
    migrate(&db).await?;
    Ok(db)
}

/// Tag ids currently linked to an article.
pub(crate) async fn tag_ids_of(db: &DatabaseConnection, article_id: i32) -> Result<BTreeSet<i32>> {
    let ids: Vec<i32> = article_tag::Entity::find()
        .select_only()
        .column(article_tag::Column::TagId)
        .filter(article_tag::Column::ArticleId.eq(article_id))
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}
