//! Building blocks shared by the HTTP modules

pub mod error;
pub mod extract;
pub mod json_body;

pub use error::{ApiError, ApiErrorBody, ApiSubError};
pub use extract::{IdPath, RequestLocale};
pub use json_body::{JsonBody, JsonBodyRejection};
