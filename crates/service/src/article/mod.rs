//! Article CRUD including management of the article's tag associations.

pub mod repository;
pub mod service;

pub use service::ArticleService;
