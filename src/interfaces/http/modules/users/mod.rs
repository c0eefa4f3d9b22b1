//! Users resource: CRUD over `/api/users`

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
