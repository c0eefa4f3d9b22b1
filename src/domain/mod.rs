//! Domain layer: the `User` aggregate, its DTOs, the repository port and
//! domain errors. Nothing here knows about HTTP or SeaORM entities.

pub mod error;
pub mod user;

pub use error::{Constraint, DomainError, DomainResult, FieldViolation, InfraError};
pub use user::*;
