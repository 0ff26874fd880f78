mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use vibeplaces_core::RandomSource;
use vibeplaces_maps::MapsClient;

use crate::{
    api::{build_app, AppState},
    middleware::OriginPolicy,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = vibeplaces_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = vibeplaces_core::load_vibes(config.vibes_path.as_deref())?;

    let maps = match config.google_maps_api_key.as_deref() {
        Some(key) => Some(Arc::new(
            MapsClient::with_base_url(key, config.maps_timeout_secs, &config.maps_base_url)?
                .with_region(config.geocode_region.clone()),
        )),
        None => {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set; provider routes will return 500");
            None
        }
    };

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        vibes = catalog.len(),
        maps_key_present = maps.is_some(),
        seeded = config.rng_seed.is_some(),
        "starting vibeplaces server"
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        maps,
        random: RandomSource::from_seed(config.rng_seed),
        environment: config.env.clone(),
    };
    let app = build_app(state, OriginPolicy::from_config(&config));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
