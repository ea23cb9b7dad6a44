mod core;
mod features;
mod shared;

use crate::core::app::build_router;
use crate::core::config::Config;
use crate::core::database;
use crate::features::auth::JwtValidator;
use crate::features::weather_reports::{
    InMemoryWeatherReportStore, PgWeatherReportStore, WeatherReportLookup,
};
use crate::features::world_cities::{
    InMemoryWorldCityRepository, PgWorldCityRepository, WorldCityRepository, WorldCityService,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    // Pick the world city store: Postgres when configured, in-memory otherwise
    let (repository, weather_reports): (Arc<dyn WorldCityRepository>, Arc<dyn WeatherReportLookup>) =
        match &config.database {
            Some(db_config) => {
                let pool = database::create_pool(db_config).await?;
                tracing::info!("Database connection pool created");

                tracing::info!("Running database migrations...");
                database::run_migrations(&pool)
                    .await
                    .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
                tracing::info!("Database migrations completed successfully");

                (
                    Arc::new(PgWorldCityRepository::new(pool.clone())),
                    Arc::new(PgWeatherReportStore::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store, data will not persist");
                (
                    Arc::new(InMemoryWorldCityRepository::new()),
                    Arc::new(InMemoryWeatherReportStore::new()),
                )
            }
        };

    let world_city_service = Arc::new(WorldCityService::new(repository, weather_reports));
    tracing::info!("World city service initialized");

    let jwt_validator = Arc::new(
        JwtValidator::from_config(&config.auth).map_err(|e| anyhow::anyhow!(e))?,
    );
    tracing::info!("Auth configured: {}", jwt_validator.mode());

    let app = build_router(
        world_city_service,
        jwt_validator,
        &config.app,
        &config.swagger,
    );

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
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
