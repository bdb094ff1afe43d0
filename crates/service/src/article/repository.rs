use async_trait::async_trait;
use models::{article, article_tag, tag, ArticleWithTags};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Select, TransactionTrait,
};

use crate::errors::ServiceError;

/// Persistence operations on articles and their tag associations.
///
/// `tag_ids` slices are expected to be free of duplicates; the service
/// normalises them before calling in.
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<ArticleWithTags>, ServiceError>;
    async fn create(&self, title: &str, content: &str, tag_ids: &[i32]) -> Result<ArticleWithTags, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<ArticleWithTags>, ServiceError>;
    /// Replace title, content and the whole tag set in one transaction.
    async fn update(&self, id: i32, title: &str, content: &str, tag_ids: &[i32]) -> Result<ArticleWithTags, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
    /// Attach tags not yet linked. Pairs that already exist are left alone,
    /// including ones another caller inserts concurrently.
    async fn add_tags(&self, id: i32, tag_ids: &[i32]) -> Result<ArticleWithTags, ServiceError>;
    async fn remove_tags(&self, id: i32, tag_ids: &[i32]) -> Result<Option<ArticleWithTags>, ServiceError>;
}

/// Run an article query and attach each article's tags, ordered by id.
pub(crate) async fn load_with_tags<C: ConnectionTrait>(
    db: &C,
    select: Select<article::Entity>,
) -> Result<Vec<ArticleWithTags>, DbErr> {
    let rows = select
        .order_by_asc(article::Column::Id)
        .find_with_related(tag::Entity)
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(ArticleWithTags::from).collect())
}

async fn load_one<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<ArticleWithTags>, DbErr> {
    Ok(load_with_tags(db, article::Entity::find_by_id(id)).await?.into_iter().next())
}

fn vanished(id: i32) -> ServiceError {
    ServiceError::Unknown(format!("article {id} could not be read back after write"))
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmArticleRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ArticleRepository for SeaOrmArticleRepository {
    async fn list(&self) -> Result<Vec<ArticleWithTags>, ServiceError> {
        Ok(load_with_tags(&self.db, article::Entity::find()).await?)
    }

    async fn create(&self, title: &str, content: &str, tag_ids: &[i32]) -> Result<ArticleWithTags, ServiceError> {
        let txn = self.db.begin().await?;
        let created = article::create(&txn, title, content).await?;
        article_tag::link(&txn, created.id, tag_ids.iter().copied()).await?;
        let loaded = load_one(&txn, created.id).await?.ok_or_else(|| vanished(created.id))?;
        txn.commit().await?;
        Ok(loaded)
    }

    async fn get(&self, id: i32) -> Result<Option<ArticleWithTags>, ServiceError> {
        Ok(load_one(&self.db, id).await?)
    }

    async fn update(&self, id: i32, title: &str, content: &str, tag_ids: &[i32]) -> Result<ArticleWithTags, ServiceError> {
        let txn = self.db.begin().await?;
        article::update_text(&txn, id, title, content)
            .await?
            .ok_or_else(|| ServiceError::record_not_found("article", id))?;
        article_tag::unlink(&txn, id, None).await?;
        article_tag::link(&txn, id, tag_ids.iter().copied()).await?;
        let loaded = load_one(&txn, id).await?.ok_or_else(|| vanished(id))?;
        txn.commit().await?;
        Ok(loaded)
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = article::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::record_not_found("article", id));
        }
        Ok(())
    }

    async fn add_tags(&self, id: i32, tag_ids: &[i32]) -> Result<ArticleWithTags, ServiceError> {
        // One conflict-skipping insert, no read before the write. A missing
        // article shows up as an FK failure here and as `None` on reload.
        let linked = article_tag::link(&self.db, id, tag_ids.iter().copied()).await;
        match (linked, load_one(&self.db, id).await?) {
            (_, None) => Err(ServiceError::record_not_found("article", id)),
            (Err(e), Some(_)) => Err(e.into()),
            (Ok(_), Some(loaded)) => Ok(loaded),
        }
    }

    async fn remove_tags(&self, id: i32, tag_ids: &[i32]) -> Result<Option<ArticleWithTags>, ServiceError> {
        article_tag::unlink(&self.db, id, Some(tag_ids)).await?;
        Ok(load_one(&self.db, id).await?)
    }
}

/// Repositories for exercising failure handling without a database.
pub mod mock {
    use super::*;
    use crate::errors::GatewayError;

    fn unavailable() -> ServiceError {
        GatewayError::Connection("database unavailable".into()).into()
    }

    /// Every call fails as if the connection pool were down.
    #[derive(Default)]
    pub struct UnavailableArticleRepository;

    #[async_trait]
    impl ArticleRepository for UnavailableArticleRepository {
        async fn list(&self) -> Result<Vec<ArticleWithTags>, ServiceError> { Err(unavailable()) }
        async fn create(&self, _: &str, _: &str, _: &[i32]) -> Result<ArticleWithTags, ServiceError> { Err(unavailable()) }
        async fn get(&self, _: i32) -> Result<Option<ArticleWithTags>, ServiceError> { Err(unavailable()) }
        async fn update(&self, _: i32, _: &str, _: &str, _: &[i32]) -> Result<ArticleWithTags, ServiceError> { Err(unavailable()) }
        async fn delete(&self, _: i32) -> Result<(), ServiceError> { Err(unavailable()) }
        async fn add_tags(&self, _: i32, _: &[i32]) -> Result<ArticleWithTags, ServiceError> { Err(unavailable()) }
        async fn remove_tags(&self, _: i32, _: &[i32]) -> Result<Option<ArticleWithTags>, ServiceError> { Err(unavailable()) }
    }
}
