use models::errors::ModelError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Failure reported by the persistence layer, classified by cause.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("connection failure: {0}")]
    Connection(String),
    #[error("query failure: {0}")]
    Query(String),
}

impl GatewayError {
    /// Stable numeric code for logging
    pub fn code(&self) -> u16 {
        match self {
            GatewayError::RecordNotFound(_) => 2001,
            GatewayError::Constraint(_) => 2002,
            GatewayError::Connection(_) => 2003,
            GatewayError::Query(_) => 2004,
        }
    }
}

impl From<DbErr> for GatewayError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(m)) | Some(SqlErr::ForeignKeyConstraintViolation(m)) => {
                return GatewayError::Constraint(m);
            }
            _ => {}
        }
        match err {
            DbErr::RecordNotFound(m) => GatewayError::RecordNotFound(m),
            DbErr::RecordNotUpdated => GatewayError::RecordNotFound("no row was updated".into()),
            DbErr::ConnectionAcquire(e) => GatewayError::Connection(e.to_string()),
            DbErr::Conn(e) => GatewayError::Connection(e.to_string()),
            other => GatewayError::Query(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("internal failure: {0}")]
    Gateway(#[from] GatewayError),
    #[error("unexpected failure: {0}")]
    Unknown(String),
}

impl ServiceError {
    pub fn record_not_found(entity: &str, id: i32) -> Self {
        Self::Gateway(GatewayError::RecordNotFound(format!("{entity} {id}")))
    }

    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Gateway(g) => g.code(),
            ServiceError::Unknown(_) => 1900,
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        Self::Gateway(err.into())
    }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::Db(e) => e.into(),
        }
    }
}
