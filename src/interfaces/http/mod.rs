//! HTTP interface
//!
//! - `common`: error body, JSON and path extractors
//! - `modules`: users resource, health, metrics, request id
//! - `router`: route table, middleware stack and Swagger UI

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, RouterOptions};
