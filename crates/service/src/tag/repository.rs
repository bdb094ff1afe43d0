use async_trait::async_trait;
use models::{article, article_tag, tag, ArticleWithTags};
use sea_orm::{
    sea_query::Query, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::article::repository::load_with_tags;
use crate::errors::ServiceError;

/// Persistence operations on tags.
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<tag::Model>, ServiceError>;
    async fn create(&self, name: &str) -> Result<tag::Model, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<tag::Model>, ServiceError>;
    async fn update(&self, id: i32, name: &str) -> Result<tag::Model, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
    /// Articles having at least one association with `tag_id`, with all their tags.
    async fn list_articles(&self, tag_id: i32) -> Result<Vec<ArticleWithTags>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmTagRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn list(&self) -> Result<Vec<tag::Model>, ServiceError> {
        Ok(tag::Entity::find().order_by_asc(tag::Column::Id).all(&self.db).await?)
    }

    async fn create(&self, name: &str) -> Result<tag::Model, ServiceError> {
        Ok(tag::create(&self.db, name).await?)
    }

    async fn get(&self, id: i32) -> Result<Option<tag::Model>, ServiceError> {
        Ok(tag::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn update(&self, id: i32, name: &str) -> Result<tag::Model, ServiceError> {
        tag::rename(&self.db, id, name)
            .await?
            .ok_or_else(|| ServiceError::record_not_found("tag", id))
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let res = tag::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(ServiceError::record_not_found("tag", id));
        }
        Ok(())
    }

    async fn list_articles(&self, tag_id: i32) -> Result<Vec<ArticleWithTags>, ServiceError> {
        let linked = Query::select()
            .column(article_tag::Column::ArticleId)
            .from(article_tag::Entity)
            .and_where(article_tag::Column::TagId.eq(tag_id))
            .to_owned();
        let select = article::Entity::find().filter(article::Column::Id.in_subquery(linked));
        Ok(load_with_tags(&self.db, select).await?)
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
    pub struct UnavailableTagRepository;

    #[async_trait]
    impl TagRepository for UnavailableTagRepository {
        async fn list(&self) -> Result<Vec<tag::Model>, ServiceError> { Err(unavailable()) }
        async fn create(&self, _: &str) -> Result<tag::Model, ServiceError> { Err(unavailable()) }
        async fn get(&self, _: i32) -> Result<Option<tag::Model>, ServiceError> { Err(unavailable()) }
        async fn update(&self, _: i32, _: &str) -> Result<tag::Model, ServiceError> { Err(unavailable()) }
        async fn delete(&self, _: i32) -> Result<(), ServiceError> { Err(unavailable()) }
        async fn list_articles(&self, _: i32) -> Result<Vec<ArticleWithTags>, ServiceError> { Err(unavailable()) }
    }
}
