//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiErrorBody, ApiSubError};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::users::{self, UsersState};
use crate::application::UserService;
use crate::shared::Locale;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::list_users,
        users::get_user,
        users::create_user,
        users::replace_user,
        users::patch_user,
        users::delete_user,
    ),
    components(
        schemas(
            users::UserDto,
            users::UserRequest,
            users::UserCollectionDto,
            users::PageMetadata,
            users::Link,
            ApiErrorBody,
            ApiSubError,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and storage reachability"),
        (name = "Users", description = "Paged, sortable CRUD over users"),
    ),
    info(
        title = "Users API",
        version = "1.0.0",
        description = "CRUD resource for users with localized validation errors"
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running application.
#[derive(Clone)]
pub struct RouterOptions {
    pub default_locale: Locale,
    /// `None` leaves `/metrics` unrouted.
    pub metrics: Option<PrometheusHandle>,
    pub started_at: Instant,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            default_locale: Locale::default(),
            metrics: None,
            started_at: Instant::now(),
        }
    }
}

pub fn create_api_router(service: Arc<UserService>, options: RouterOptions) -> Router {
    let users_state = UsersState {
        service: service.clone(),
        default_locale: options.default_locale,
    };

    let user_routes = Router::new()
        .route(
            "/api/users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::replace_user)
                .patch(users::patch_user)
                .delete(users::delete_user),
        )
        .with_state(users_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            service,
            started_at: Arc::new(options.started_at),
        });

    let swagger_routes =
        SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .merge(health_routes)
        .merge(user_routes);

    if let Some(handle) = options.metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}
