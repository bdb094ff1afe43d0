//! Tag CRUD and the articles-by-tag lookup.

pub mod repository;
pub mod service;

pub use service::TagService;
