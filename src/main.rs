use anyhow::Context;
use dotenvy::dotenv;
use edugate::logging::{LogConfig, init_tracing, shutdown_tracer};
use edugate::metrics::{init_metrics, metrics_app};
use edugate::router::init_router;
use edugate::state::{init_app_state, spawn_limiter_cleanup};
use edugate_db::{init_db_pool, run_migrations};
use tracing::{error, info};

fn env_port(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing(&LogConfig::from_env())?;

    if let Some(handle) = init_metrics()? {
        let metrics_port = env_port("METRICS_PORT", 9090);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", metrics_port))
            .await
            .context("Failed to bind metrics listener")?;
        info!("📊 Metrics available at http://localhost:{}/metrics", metrics_port);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let db = init_db_pool().await?;
    run_migrations(&db).await?;

    let state = init_app_state(db);
    spawn_limiter_cleanup(
        state.redeem_limiter.clone(),
        state.rate_limit_config.cleanup_interval(),
    );
    let app = init_router(state);

    let port = env_port("PORT", 3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .context("Failed to bind server listener")?;
    info!("🚀 Server running on http://localhost:{}", port);
    info!("📚 Swagger UI available at http://localhost:{}/swagger-ui", port);
    info!("📖 Scalar UI available at http://localhost:{}/scalar", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
