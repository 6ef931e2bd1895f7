//! Request-level error taxonomy.
//!
//! Every failing operation maps to one of three cases: bad input (400),
//! missing record (404), or a uniqueness/reference conflict (400). Storage
//! errors are caught at the request boundary and re-surfaced with the
//! driver message; no request failure is fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input, including a referenced foreign id
    /// that does not exist.
    #[error("{0}")]
    Validation(String),

    /// The id or key addressed by the request is absent.
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness or referential constraint was violated.
    #[error("{0}")]
    Conflict(String),
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{resource} with id {id} not found"))
    }
}

// Postgres error classes 23505 (unique_violation) and 23503
// (foreign_key_violation) are conflicts; everything else from the storage
// layer is surfaced as a client error with the underlying message. The
// 23503 message is rewritten: the raw driver text names constraint
// internals the client cannot act on.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if let Some(code) = db.code() {
                if code == "23505" {
                    return ApiError::Conflict(db.message().to_string());
                }
                if code == "23503" {
                    return ApiError::Conflict(
                        "record is still referenced by other records".to_string(),
                    );
                }
            }
        }
        ApiError::Validation(format!("storage error: {err}"))
    }
}
