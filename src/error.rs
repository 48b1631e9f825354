// Catalog errors
// Every library operation returns `Result<T>`; binaries wrap these in anyhow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// A record (or the related record it points to) does not exist.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// A filter criterion names a path the entity does not expose.
    #[error("unknown filter field: {0}")]
    UnknownField(String),

    #[error("invalid page request: page {number}, size {size}")]
    InvalidPage { number: usize, size: usize },

    /// A submitted number is NaN or infinite.
    #[error("{field} must be a finite number")]
    InvalidValue { field: &'static str },

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl CatalogError {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        CatalogError::NotFound { kind, id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Raised when a stored or submitted enum name is not one of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}
