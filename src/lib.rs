//! # Users service
//!
//! A CRUD resource for users under `/api/users`: paged and sortable
//! listing, lookup, create, full replace, partial merge and delete, with
//! field validation errors localized from `Accept-Language`.
//!
//! ## Architecture
//!
//! - **domain**: `User`, request DTOs, field rules, `DomainError`, repository port
//! - **application**: `UserService` (validation, e-mail uniqueness, merge rules)
//! - **infrastructure**: SeaORM/SQLite repository with migrations and seed, in-memory repository
//! - **interfaces**: axum router, HAL representations, error body, health and metrics
//! - **shared**: pagination, locales, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, StorageBackend};

pub use application::{UserService, UserServiceConfig};
pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository, UserRepository};

pub use interfaces::http::{create_api_router, RouterOptions};
