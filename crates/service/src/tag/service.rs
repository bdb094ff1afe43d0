use std::sync::Arc;

use models::{tag, ArticleWithTags};
use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use crate::tag::repository::TagRepository;

/// Application service for tags. Stateless apart from the injected repository.
#[derive(Clone)]
pub struct TagService {
    repo: Arc<dyn TagRepository>,
}

fn log_failure(op: &'static str) -> impl Fn(&ServiceError) {
    move |e| error!(op, code = e.code(), error = %e, "tag operation failed")
}

impl TagService {
    pub fn new(repo: Arc<dyn TagRepository>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<tag::Model>, ServiceError> {
        self.repo.list().await.inspect_err(log_failure("list"))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, name: &str) -> Result<tag::Model, ServiceError> {
        tag::validate_name(name)?;
        let created = self.repo.create(name).await.inspect_err(log_failure("create"))?;
        info!(id = created.id, name = %created.name, "created tag");
        Ok(created)
    }

    /// `Ok(None)` when no tag has this id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Option<tag::Model>, ServiceError> {
        self.repo.get(id).await.inspect_err(log_failure("get"))
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, name: &str) -> Result<tag::Model, ServiceError> {
        tag::validate_name(name)?;
        let updated = self.repo.update(id, name).await.inspect_err(log_failure("update"))?;
        info!(id, "updated tag");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete(id).await.inspect_err(log_failure("delete"))?;
        info!(id, "deleted tag");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_articles(&self, tag_id: i32) -> Result<Vec<ArticleWithTags>, ServiceError> {
        self.repo.list_articles(tag_id).await.inspect_err(log_failure("list_articles"))
    }
}
