use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use thiserror::Error;
use tokio::sync::watch;
use tracing::warn;

use blockwatch_domain::config::{ApiConfig, ConfigError, MonitorConfig};
use blockwatch_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryError};
use blockwatch_domain::Registry;
use blockwatch_monitor::{run_monitor, EthRpcSource, MonitorError};

use crate::{
    handlers::{metrics_handler, subscribe_handler, transactions_handler},
    state::AppState,
};

pub async fn run() -> Result<(), BootstrapError> {
    let api_config = ApiConfig::load_from_env()?;
    let monitor_config = MonitorConfig::load_from_env()?;

    let telemetry_config = TelemetryConfig::from_env("API");
    let telemetry = init_telemetry(&telemetry_config)?;

    let registry = Arc::new(Registry::new());
    let source = EthRpcSource::new(monitor_config.rpc_url(), monitor_config.rpc_timeout())?;

    // The monitor shares the registry through the Arc and stops when the
    // shutdown signal fires.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = tokio::spawn(run_monitor(
        monitor_config.poll_interval(),
        Arc::clone(&registry),
        source,
        shutdown_rx,
    ));

    let state = AppState::new(registry, telemetry);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(web::resource("/subscribe").route(web::post().to(subscribe_handler)))
            .service(
                web::resource("/transactions/{address}")
                    .route(web::get().to(transactions_handler)),
            )
            .route("/metrics", web::get().to(metrics_handler))
    })
    .bind(api_config.bind_address())?
    .run()
    .await?;

    // Server is down; stop the poller and let any in-flight cycle finish.
    let _ = shutdown_tx.send(true);
    if let Err(err) = monitor.await {
        warn!(%err, "monitor task did not shut down cleanly");
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("monitor error: {0}")]
    Monitor(#[from] MonitorError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
