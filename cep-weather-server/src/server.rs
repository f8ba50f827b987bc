use anyhow::Context;
use cep_weather_core::{Settings, WeatherService};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::routes::{WEATHER_PATH, router};

/// Binds the listener and serves until Ctrl-C.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let service = WeatherService::from_settings(&settings)?;
    let app = router(service).layer(TraceLayer::new_for_http());

    let bind_address = settings.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!(
        address = %bind_address,
        weatherapi = %settings.weatherapi_url,
        viacep = %settings.viacep_url,
        "server starting"
    );
    tracing::info!("  GET {WEATHER_PATH}?cep=<8 digits>");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
