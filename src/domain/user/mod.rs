//! User aggregate
//!
//! Contains the User entity, DTOs, field validation and repository interface.

pub mod model;
pub mod repository;
pub mod validation;

mod dto_create;
mod dto_get;
mod dto_update;

pub use model::{User, UserFields, USERS_EMAIL_INDEX};

pub use dto_create::CreateUserDto;
pub use dto_get::{Direction, GetUserDto, SortField, SortOrder};
pub use dto_update::UpdateUserDto;

pub use repository::UserRepositoryInterface;
