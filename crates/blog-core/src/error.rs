//! Domain-level error types.

use std::fmt;

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Post with id {0} not found.")]
    PostNotFound(u64),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Only the author may modify post {0}")]
    NotAuthor(u64),

    #[error(transparent)]
    Storage(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Parameter and payload validation failures.
///
/// Every variant renders a stable message and exposes a stable
/// [`kind`](ValidationError::kind) code so API consumers can tell causes apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid data. Data requires {}", FieldList(.0))]
    MissingFields(Vec<String>),

    #[error("'{field}' is not a valid field to sort. Try: {}", FieldList(.allowed))]
    InvalidSortField { field: String, allowed: Vec<String> },

    #[error("'{direction}' is not a valid direction to sort. Try: {}", FieldList(.allowed))]
    InvalidSortDirection {
        direction: String,
        allowed: Vec<String>,
    },

    #[error("'sort'-parameter is required when 'direction' is given. Try: {}", FieldList(.allowed))]
    DirectionWithoutField { allowed: Vec<String> },

    #[error("page and limit must be integers.")]
    NonIntegerPaginationParam,

    #[error("page and limit must be greater than 0.")]
    NonPositivePaginationParam,
}

impl ValidationError {
    /// Machine-readable error code.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingFields(_) => "missing_fields",
            ValidationError::InvalidSortField { .. } => "invalid_sort_field",
            ValidationError::InvalidSortDirection { .. } => "invalid_sort_direction",
            ValidationError::DirectionWithoutField { .. } => "direction_without_field",
            ValidationError::NonIntegerPaginationParam => "non_integer_pagination_param",
            ValidationError::NonPositivePaginationParam => "non_positive_pagination_param",
        }
    }

    /// The accepted values, for errors raised against an allow-list.
    pub fn allowed(&self) -> Option<&[String]> {
        match self {
            ValidationError::InvalidSortField { allowed, .. }
            | ValidationError::InvalidSortDirection { allowed, .. }
            | ValidationError::DirectionWithoutField { allowed } => Some(allowed),
            _ => None,
        }
    }
}

struct FieldList<'a>(&'a [String]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
