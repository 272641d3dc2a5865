mod config;
mod wiring;

use std::{error::Error, sync::Arc};

use api::AppState;
use runtime::{shared, spawn_refreshers, MarketEngine, Selection, TracingSink};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "dashboard_server=info,runtime=info,api=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let config = config::Config::from_env()?;
    let selection = Selection::new(config.instrument, config.range);
    let engine = match config.seed {
        Some(seed) => MarketEngine::seeded(seed, selection),
        None => MarketEngine::from_entropy(selection),
    };

    let state = AppState::new(shared(engine));
    let refreshers = spawn_refreshers(
        Arc::clone(state.engine()),
        config.refresh_interval,
        Arc::new((TracingSink, state.clone())),
    );

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        addr = %config.listen_addr,
        instrument = %config.instrument,
        range = config.range.as_str(),
        seeded = config.seed.is_some(),
        "dashboard server listening"
    );

    axum::serve(listener, wiring::build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for handle in refreshers {
        handle.abort();
    }
    info!("dashboard server stopped");
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
