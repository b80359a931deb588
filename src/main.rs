use erp_mock::{
    common_routes, ensure_tables, erp_routes, seed_products, spawn_allocator, spawn_sweeper,
    AppConfig, AppState, CodeAllocator, PgCodeStore,
};
use axum::http::{HeaderName, Method};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("erp_mock=info")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    ensure_tables(&pool).await?;
    seed_products(&pool).await?;

    let codes = Arc::new(CodeAllocator::new(
        Arc::new(PgCodeStore::new(pool.clone())),
        config.clone(),
    ));
    let (allocator, allocator_worker) = spawn_allocator(codes.clone());
    let sweeper = spawn_sweeper(pool.clone(), config.expiration_ttl_seconds);

    let state = AppState {
        pool,
        config: config.clone(),
        allocator,
        codes,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([
            HeaderName::from_static("origin"),
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("apikey"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    let app = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/spic_to_erp", erp_routes(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the state releases the last queue handle; the worker then
    // drains outstanding allocations before exiting.
    sweeper.abort();
    drop(state);
    allocator_worker.await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to install shutdown handler: {}", e);
    }
}
