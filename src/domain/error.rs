//! Domain errors

use thiserror::Error;

/// A single constraint a user field can violate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Field missing or `null`
    NotNull,
    /// Character count outside `min..=max`
    Size { min: u64, max: u64 },
    /// Not a well-formed e-mail address
    Email,
    /// Date is today or in the future
    Past,
}

impl Constraint {
    /// Stable, locale-independent error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotNull => "NotNull",
            Self::Size { .. } => "Size",
            Self::Email => "Email",
            Self::Past => "Past",
        }
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    /// JSON property name (`firstName`, `dayOfBirth`, ...)
    pub field: String,
    pub constraint: Constraint,
    pub rejected_value: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed with {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn user_not_found(id: i64) -> Self {
        Self::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        match e {
            InfraError::Database(db) => match db.sql_err() {
                Some(sea_orm::SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
                _ => DomainError::Storage(db.to_string()),
            },
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
