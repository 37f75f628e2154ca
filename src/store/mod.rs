//! Data access for products.
//!
//! Handlers only ever see the [`Store`] trait; the Postgres implementation is
//! constructed once in `main` and injected through `AppState`.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::models::{NewProduct, Product};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[cfg(test)]
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("product {0} not found")]
    NotFound(i64),

    /// The database refused the submitted values (constraint or data error).
    #[error("rejected by database: {0}")]
    Rejected(String),

    #[error("database unavailable: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            // SQLSTATE class 22: data exception (value too long, out of range, ...)
            let data_exception = db.code().map_or(false, |code| code.starts_with("22"));
            let constraint = matches!(
                db.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
            );
            if constraint || data_exception {
                return StoreError::Rejected(db.message().to_string());
            }
        }

        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Connection(err),
            other => StoreError::Query(other),
        }
    }
}

/// The five product operations. Each call runs exactly one statement.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert `name`/`stock` and return the row with its generated id.
    async fn create(&self, product: &NewProduct) -> StoreResult<Product>;

    /// Every product, ordered by id.
    async fn read_all(&self) -> StoreResult<Vec<Product>>;

    /// Fails with [`StoreError::NotFound`] when no row has this id.
    async fn read(&self, id: i64) -> StoreResult<Product>;

    /// Overwrite `name`/`stock`; the id is kept. Unknown ids are `NotFound`.
    async fn update(&self, id: i64, product: &NewProduct) -> StoreResult<Product>;

    /// Unknown ids are `NotFound`.
    async fn delete(&self, id: i64) -> StoreResult<()>;
}
