//! Service layer exposing the tag and article operations on top of models.
//! - Repository traits are the persistence seam; SeaORM implementations live beside them.
//! - Services validate input, normalise tag id sets and log failures.
//! - Every persistence failure surfaces as `ServiceError::Gateway`.

pub mod errors;
pub mod tag;
pub mod article;
#[cfg(test)]
pub mod test_support;
