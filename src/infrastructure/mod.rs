//! Infrastructure layer - external concerns

pub mod database;
pub mod seed;
pub mod storage;

pub use database::repositories::UserRepository;
pub use database::{init_database, DatabaseConfig};
pub use storage::InMemoryUserRepository;
