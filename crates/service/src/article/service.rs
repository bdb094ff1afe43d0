use std::collections::BTreeSet;
use std::sync::Arc;

use models::{article, ArticleWithTags};
use tracing::{error, info, instrument};

use crate::article::repository::ArticleRepository;
use crate::errors::ServiceError;

/// Application service for articles and their tag associations.
#[derive(Clone)]
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

fn log_failure(op: &'static str) -> impl Fn(&ServiceError) {
    move |e| error!(op, code = e.code(), error = %e, "article operation failed")
}

/// Collapse a requested tag id list to one entry per id. Absent means none.
fn unique_tag_ids(tag_ids: Option<&[i32]>) -> Vec<i32> {
    tag_ids
        .unwrap_or_default()
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self { Self { repo } }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ArticleWithTags>, ServiceError> {
        self.repo.list().await.inspect_err(log_failure("list"))
    }

    /// Create an article and, atomically with it, one association per unique tag id.
    #[instrument(skip(self, content))]
    pub async fn create(&self, title: &str, content: &str, tag_ids: Option<&[i32]>) -> Result<ArticleWithTags, ServiceError> {
        article::validate_text(title, content)?;
        let tag_ids = unique_tag_ids(tag_ids);
        let created = self
            .repo
            .create(title, content, &tag_ids)
            .await
            .inspect_err(log_failure("create"))?;
        info!(id = created.article.id, tags = tag_ids.len(), "created article");
        Ok(created)
    }

    /// `Ok(None)` when no article has this id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Option<ArticleWithTags>, ServiceError> {
        self.repo.get(id).await.inspect_err(log_failure("get"))
    }

    /// Replace title, content and the full tag set. Omitted or empty `tag_ids`
    /// leaves the article without tags.
    #[instrument(skip(self, content))]
    pub async fn update(&self, id: i32, title: &str, content: &str, tag_ids: Option<&[i32]>) -> Result<ArticleWithTags, ServiceError> {
        article::validate_text(title, content)?;
        let tag_ids = unique_tag_ids(tag_ids);
        let updated = self
            .repo
            .update(id, title, content, &tag_ids)
            .await
            .inspect_err(log_failure("update"))?;
        info!(id, tags = tag_ids.len(), "updated article");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete(id).await.inspect_err(log_failure("delete"))?;
        info!(id, "deleted article");
        Ok(())
    }

    /// Attach tags to an article; pairs that already exist are skipped.
    #[instrument(skip(self))]
    pub async fn add_tags(&self, id: i32, tag_ids: &[i32]) -> Result<ArticleWithTags, ServiceError> {
        let tag_ids = unique_tag_ids(Some(tag_ids));
        self.repo.add_tags(id, &tag_ids).await.inspect_err(log_failure("add_tags"))
    }

    /// Detach the given tags, leaving other associations intact.
    /// `Ok(None)` when the article does not exist.
    #[instrument(skip(self))]
    pub async fn remove_tags(&self, id: i32, tag_ids: &[i32]) -> Result<Option<ArticleWithTags>, ServiceError> {
        let tag_ids = unique_tag_ids(Some(tag_ids));
        self.repo.remove_tags(id, &tag_ids).await.inspect_err(log_failure("remove_tags"))
    }
}
