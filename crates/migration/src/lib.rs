//! Migrator registering entity-specific migrations in dependency order.
//! The junction table comes last since it references both parents.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_article;
mod m20240101_000002_create_tag;
mod m20240101_000003_create_article_tags;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_article::Migration),
            Box::new(m20240101_000002_create_tag::Migration),
            Box::new(m20240101_000003_create_article_tags::Migration),
        ]
    }
}
