use std::sync::Arc;

use configs::Environment;
use sea_orm::DatabaseConnection;
use service::article::{repository::SeaOrmArticleRepository, ArticleService};
use service::tag::{repository::SeaOrmTagRepository, TagService};

/// Shared handler state: the two services plus the error-detail switch.
#[derive(Clone)]
pub struct AppState {
    pub tags: TagService,
    pub articles: ArticleService,
    /// Attach service error text to 500 responses of create operations.
    pub expose_error_detail: bool,
}

impl AppState {
    pub fn new(tags: TagService, articles: ArticleService, environment: Environment) -> Self {
        Self { tags, articles, expose_error_detail: environment.is_development() }
    }

    /// Wire SeaORM repositories over one connection pool.
    pub fn from_db(db: DatabaseConnection, environment: Environment) -> Self {
        let tags = TagService::new(Arc::new(SeaOrmTagRepository { db: db.clone() }));
        let articles = ArticleService::new(Arc::new(SeaOrmArticleRepository { db }));
        Self::new(tags, articles, environment)
    }
}
