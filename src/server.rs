//! Server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, storage
//! selection, migrations, optional reseed, the HTTP listener and graceful
//! shutdown. The binary and the integration tests both go through it.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::UserService;
use crate::config::{AppConfig, StorageBackend};
use crate::domain::UserRepositoryInterface;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, InMemoryUserRepository, UserRepository};
use crate::interfaces::http::{create_api_router, RouterOptions};
use crate::shared::shutdown::{ShutdownCoordinator, ShutdownSignal};

/// Options for starting the service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

/// Handle to a running service.
///
/// ```rust,no_run
/// use users_api::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    pub service: Arc<UserService>,
    pub config: AppConfig,

    local_addr: SocketAddr,
    db: Option<DatabaseConnection>,
    shutdown: ShutdownCoordinator,
    api_task: JoinHandle<()>,
}

/// The global recorder can only be installed once per process, so a
/// restart within the same process reuses the first handle.
fn prometheus_handle() -> Option<PrometheusHandle> {
    static PROM_HANDLE: OnceLock<Option<PrometheusHandle>> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                info!("Prometheus metrics recorder installed");
                Some(handle)
            }
            Err(e) => {
                warn!("Prometheus recorder unavailable, /metrics disabled: {}", e);
                None
            }
        })
        .clone()
}

impl ServerHandle {
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let config = opts.config;
        info!("Starting users service...");

        let metrics = prometheus_handle();

        let (repo, db): (Arc<dyn UserRepositoryInterface>, Option<DatabaseConnection>) =
            match config.database.backend {
                StorageBackend::Sqlite => {
                    let db = init_database(&config.database.to_database_config()).await?;
                    if opts.auto_migrate {
                        info!("Running database migrations...");
                        Migrator::up(&db, None).await?;
                        info!("Migrations completed");
                    }
                    let repo: Arc<dyn UserRepositoryInterface> =
                        Arc::new(UserRepository::new(db.clone()));
                    (repo, Some(db))
                }
                StorageBackend::Memory => {
                    info!("Using in-memory user storage");
                    let repo: Arc<dyn UserRepositoryInterface> =
                        Arc::new(InMemoryUserRepository::new());
                    (repo, None)
                }
            };

        let service = Arc::new(UserService::new(repo, config.service_config()));

        if config.seed.reset_on_start {
            info!("Resetting users to the seed snapshot");
            service.reset().await?;
        }

        let router = create_api_router(
            service.clone(),
            RouterOptions {
                default_locale: config.validation.default_locale,
                metrics,
                started_at: Instant::now(),
            },
        );

        let shutdown = ShutdownCoordinator::new(config.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        let listener = tokio::net::TcpListener::bind(config.server.address()).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_task = tokio::spawn(async move {
            let server = axum::serve(listener, router).with_graceful_shutdown(async move {
                api_shutdown.wait().await;
                info!("REST API received shutdown signal");
            });
            if let Err(e) = server.await {
                error!("REST API server error: {}", e);
            }
        });

        Ok(Self {
            service,
            config,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Bound address; useful when the configured port is 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install SIGTERM/SIGINT listeners that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait for in-flight requests (bounded by `server.shutdown_timeout`),
    /// then close the database.
    pub async fn wait(self) {
        let abort = self.api_task.abort_handle();
        let api_task = self.api_task;

        let drained = self
            .shutdown
            .drain(async move {
                if let Err(e) = api_task.await {
                    error!("REST API task failed: {}", e);
                }
            })
            .await;
        if !drained {
            abort.abort();
        }

        if let Some(db) = self.db {
            match db.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => warn!("Error closing database connection: {}", e),
            }
        }

        info!("Users service stopped");
    }

    pub async fn shutdown(self) {
        info!("Shutting down users service...");
        self.trigger_shutdown();
        self.wait().await;
    }
}

/// Initialize tracing from the application config. `RUST_LOG` takes
/// precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.server.shutdown_timeout = 5;
        config.database.backend = StorageBackend::Memory;
        config
    }

    async fn raw_get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_users_and_stops() {
        let handle = ServerHandle::start(ServerOptions {
            config: memory_config(),
            auto_migrate: false,
        })
        .await
        .unwrap();

        let response = raw_get(handle.local_addr(), "/api/users/10").await;
        assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
        assert!(response.contains("workingemail-10@gmail.com"));

        assert!(handle.is_running());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn sqlite_backend_migrates_and_seeds() {
        let mut config = memory_config();
        config.database.backend = StorageBackend::Sqlite;
        config.database.url = Some("sqlite::memory:".to_string());

        let handle = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
        })
        .await
        .unwrap();

        let page = handle
            .service
            .list_users(crate::domain::GetUserDto::default())
            .await
            .unwrap();
        assert_eq!(page.total, 20);

        handle.shutdown().await;
    }
}
