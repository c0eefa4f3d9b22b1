//! Application layer: use-cases orchestrating the domain and its ports.

pub mod users;

pub use users::{UserService, UserServiceConfig};
