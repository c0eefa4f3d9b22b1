//! Prometheus scrape endpoint and the middleware feeding it

pub mod handlers;
pub mod middleware;

pub use handlers::{prometheus_metrics, MetricsState};
pub use middleware::http_metrics_middleware;
