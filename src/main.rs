mod core;
mod features;
mod shared;

use crate::core::config::{Config, StorageBackend};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::defects::{
    routes as defects_routes, DefectRepository, DefectService, InMemoryDefectRepository,
    PgDefectRepository,
};
use crate::features::users::{
    routes as users_routes, InMemoryUserRepository, PgUserRepository, UserRepository,
    UserService,
};
use crate::shared::seed;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

/// Repository handles for the selected storage backend
async fn open_repositories(
    config: &Config,
) -> anyhow::Result<(Arc<dyn DefectRepository>, Arc<dyn UserRepository>)> {
    match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .ok_or_else(|| {
                    anyhow::anyhow!("PostgreSQL backend selected without DATABASE_URL")
                })?;

            let pool = database::create_pool(db_config).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            let defects: Arc<dyn DefectRepository> = Arc::new(PgDefectRepository::new(pool.clone()));
            let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));
            Ok((defects, users))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            if !config.storage.seed_sample_data {
                let defects: Arc<dyn DefectRepository> = Arc::new(InMemoryDefectRepository::new());
                let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
                return Ok((defects, users));
            }

            let sample_defects = seed::sample_defects()?;
            let sample_users = seed::sample_users()?;
            tracing::info!(
                "Seeded in-memory storage with {} defects and {} users",
                sample_defects.len(),
                sample_users.len()
            );
            let defects: Arc<dyn DefectRepository> =
                Arc::new(InMemoryDefectRepository::with_defects(sample_defects));
            let users: Arc<dyn UserRepository> =
                Arc::new(InMemoryUserRepository::with_users(sample_users));
            Ok((defects, users))
        }
    }
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );
    tracing::info!(
        "Configuration loaded: storage={:?}, test_types={:?}, page_sizes={:?}, reporting_offset={}",
        config.storage.backend,
        config.defects.test_types,
        config.defects.page_sizes,
        config.defects.reporting_offset
    );

    let (defect_repo, user_repo) = open_repositories(&config).await?;
    let policy = Arc::new(config.defects.clone());

    let defect_service = Arc::new(DefectService::new(
        Arc::clone(&defect_repo),
        Arc::clone(&policy),
    ));
    let user_service = Arc::new(UserService::new(user_repo));
    let dashboard_service = Arc::new(DashboardService::new(defect_repo, policy));
    tracing::info!("Defect, user and dashboard services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let app = Router::new()
        .merge(swagger)
        .merge(defects_routes(defect_service))
        .merge(users_routes(user_service))
        .merge(dashboard_routes(dashboard_service))
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
