pub mod errors;
pub mod db;
pub mod article;
pub mod tag;
pub mod article_tag;

pub use article::ArticleWithTags;

#[cfg(test)]
mod tests;
