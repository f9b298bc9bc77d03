mod api;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use leadgate_core::{AppConfig, BrandRegistry};
use leadgate_flows::{TracingAnalytics, ZipRouter};
use leadgate_intake::{connect_pool, LeadIntake, PgLeadStore};
use leadgate_places::{AddressResolver, PlacesClient};
use leadgate_weather::{WeatherClient, WeatherService};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = leadgate_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = Arc::new(BrandRegistry::load(config.brands_path.as_deref())?);
    tracing::info!(brands = registry.all_brands().len(), env = %config.env, "brand table loaded");

    let places = config
        .google_places_api_key
        .as_deref()
        .map(|key| PlacesClient::new(key, config.upstream_timeout_secs, &config.user_agent))
        .transpose()?;
    if places.is_none() {
        tracing::warn!("GOOGLE_PLACES_API_KEY not set; address lookups use static fallback data");
    }

    let weather_client = config
        .openweather_api_key
        .as_deref()
        .map(|key| WeatherClient::new(key, config.upstream_timeout_secs, &config.user_agent))
        .transpose()?;
    if weather_client.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; weather uses static fallback data");
    }

    let intake = build_intake(&config).await?;
    let router = ZipRouter::new(
        Arc::clone(&registry),
        Arc::new(AddressResolver::new(places.clone())),
        Arc::new(TracingAnalytics),
    );

    let state = AppState {
        registry,
        places,
        router,
        weather: WeatherService::new(weather_client),
        intake,
    };
    let auth = AuthState::from_env(config.is_development())?;
    let rate_limit = default_rate_limit_state().trust_forwarded_for_from_env();
    let app = build_app(state, auth, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn build_intake(config: &AppConfig) -> anyhow::Result<LeadIntake> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; leads are kept in memory and lost on restart");
        return Ok(LeadIntake::in_memory());
    };

    let pool = connect_pool(database_url, config.db_max_connections)
        .await
        .context("connecting to lead database")?;
    let store = PgLeadStore::migrated(pool)
        .await
        .context("running lead database migrations")?;
    Ok(LeadIntake::new(Arc::new(store)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
