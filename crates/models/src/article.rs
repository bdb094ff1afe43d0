use chrono::Utc;
use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::{article_tag, errors::ModelError, tag};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ArticleTag,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ArticleTag => Entity::has_many(article_tag::Entity).into(),
        }
    }
}

impl Related<article_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArticleTag.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        article_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(article_tag::Relation::Article.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An article together with its resolved tag associations, in the shape
/// returned by the HTTP API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleWithTags {
    #[serde(flatten)]
    pub article: Model,
    pub article_tags: Vec<article_tag::TagLink>,
}

impl ArticleWithTags {
    pub fn tag_ids(&self) -> Vec<i32> {
        self.article_tags.iter().map(|l| l.tag_id).collect()
    }
}

impl From<(Model, Vec<tag::Model>)> for ArticleWithTags {
    fn from((article, tags): (Model, Vec<tag::Model>)) -> Self {
        let article_tags = tags
            .into_iter()
            .map(|tag| article_tag::TagLink { article_id: article.id, tag_id: tag.id, tag })
            .collect();
        Self { article, article_tags }
    }
}

pub fn validate_text(title: &str, content: &str) -> Result<(), ModelError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(ModelError::Validation("Title and content are required".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, title: &str, content: &str) -> Result<Model, ModelError> {
    validate_text(title, content)?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Replace title and content of an existing article. `Ok(None)` when no row has this id.
pub async fn update_text<C: ConnectionTrait>(
    db: &C,
    id: i32,
    title: &str,
    content: &str,
) -> Result<Option<Model>, ModelError> {
    validate_text(title, content)?;
    let Some(found) = Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };
    let mut am: ActiveModel = found.into();
    am.title = Set(title.to_string());
    am.content = Set(content.to_string());
    am.updated_at = Set(Utc::now().into());
    Ok(Some(am.update(db).await?))
}
