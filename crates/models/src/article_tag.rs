use sea_orm::{entity::prelude::*, sea_query::OnConflict, Set};
use serde::{Deserialize, Serialize};

use crate::{article, tag};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "article_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub article_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Article,
    Tag,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Article => Entity::belongs_to(article::Entity)
                .from(Column::ArticleId)
                .to(article::Column::Id)
                .into(),
            Relation::Tag => Entity::belongs_to(tag::Entity)
                .from(Column::TagId)
                .to(tag::Column::Id)
                .into(),
        }
    }
}

impl Related<article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One association as exposed on an article: the junction keys plus the tag itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagLink {
    pub article_id: i32,
    pub tag_id: i32,
    pub tag: tag::Model,
}

/// Insert one association per tag id. Pairs that already exist are skipped,
/// so concurrent callers linking the same pair both succeed. Returns the
/// number of rows written.
pub async fn link<C, I>(db: &C, article_id: i32, tag_ids: I) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
    I: IntoIterator<Item = i32>,
{
    let rows: Vec<ActiveModel> = tag_ids
        .into_iter()
        .map(|tag_id| ActiveModel { article_id: Set(article_id), tag_id: Set(tag_id) })
        .collect();
    if rows.is_empty() {
        return Ok(0);
    }
    Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([Column::ArticleId, Column::TagId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
}

/// Remove associations of an article; `None` removes all of them.
pub async fn unlink<C: ConnectionTrait>(db: &C, article_id: i32, tag_ids: Option<&[i32]>) -> Result<u64, DbErr> {
    let mut query = Entity::delete_many().filter(Column::ArticleId.eq(article_id));
    if let Some(ids) = tag_ids {
        if ids.is_empty() {
            return Ok(0);
        }
        query = query.filter(Column::TagId.is_in(ids.iter().copied()));
    }
    Ok(query.exec(db).await?.rows_affected)
}
