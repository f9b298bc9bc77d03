use std::sync::Arc;

use leadgate_core::{format_phone_number, AppConfig, BrandRegistry};
use leadgate_flows::{TracingAnalytics, ZipRouter};
use leadgate_intake::{connect_pool, LeadIntake, PgLeadStore};
use leadgate_places::{AddressResolver, PlacesClient};
use leadgate_weather::{weather_message, WeatherClient, WeatherService};

fn registry(config: &AppConfig) -> anyhow::Result<BrandRegistry> {
    Ok(BrandRegistry::load(config.brands_path.as_deref())?)
}

/// Print every brand with its states and default phone number.
pub(crate) fn run_brands(config: &AppConfig) -> anyhow::Result<()> {
    let registry = registry(config)?;

    println!("{:<15}{:<18}{:<10}PHONE", "ID", "NAME", "STATES");
    for brand in registry.all_brands() {
        println!(
            "{:<15}{:<18}{:<10}{}",
            brand.id,
            brand.name,
            brand.coverage.states.join(","),
            format_phone_number(&brand.phone_numbers.default)
        );
    }
    Ok(())
}

/// Resolve the brand for a ZIP and/or state.
///
/// # Errors
///
/// Returns an error if neither filter is given or no brand serves the
/// location.
pub(crate) fn run_brand(
    config: &AppConfig,
    zip: Option<&str>,
    state: Option<&str>,
) -> anyhow::Result<()> {
    if zip.is_none() && state.is_none() {
        anyhow::bail!("pass --zip, --state, or both");
    }
    let registry = registry(config)?;
    let brand = registry
        .get_brand_for_location(zip, state)
        .ok_or_else(|| anyhow::anyhow!("no brand serves that location"))?;

    println!("{} ({})", brand.name, brand.id);
    println!("page: /brand/{}", brand.slug);
    Ok(())
}

fn places_client(config: &AppConfig) -> anyhow::Result<Option<PlacesClient>> {
    Ok(config
        .google_places_api_key
        .as_deref()
        .map(|key| PlacesClient::new(key, config.upstream_timeout_secs, &config.user_agent))
        .transpose()?)
}

/// Route free text the way the homepage ZIP box does.
pub(crate) async fn run_route(config: &AppConfig, input: &str) -> anyhow::Result<()> {
    let router = ZipRouter::new(
        Arc::new(registry(config)?),
        Arc::new(AddressResolver::new(places_client(config)?)),
        Arc::new(TracingAnalytics),
    );

    tracing::debug!(input, "routing");
    match router.route(input).await {
        Ok(target) => {
            println!("brand: {}", target.brand_id);
            println!("location: {}", target.location);
            Ok(())
        }
        Err(e) => anyhow::bail!("{e}"),
    }
}

/// Show weather for a ZIP, noting when it is not live data.
pub(crate) async fn run_weather(config: &AppConfig, zip: &str) -> anyhow::Result<()> {
    let client = config
        .openweather_api_key
        .as_deref()
        .map(|key| WeatherClient::new(key, config.upstream_timeout_secs, &config.user_agent))
        .transpose()?;
    let service = WeatherService::new(client);

    let data = service
        .get_weather_data(zip)
        .await
        .ok_or_else(|| anyhow::anyhow!("'{zip}' is not a five-digit ZIP code"))?;

    println!(
        "{}: {}°F, {} (humidity {}%, wind {} mph)",
        data.location, data.temperature, data.description, data.humidity, data.wind_speed
    );
    if !data.source.is_authoritative() {
        println!("note: {:?} data, not a live reading", data.source);
    }
    println!("{}", weather_message(data.condition, data.temperature));
    Ok(())
}

/// List recent leads from Postgres.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or the query fails.
pub(crate) async fn run_leads(
    config: &AppConfig,
    brand: Option<&str>,
    limit: usize,
) -> anyhow::Result<()> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set; leads are only stored in a database"))?;
    let pool = connect_pool(database_url, config.db_max_connections).await?;
    let intake = LeadIntake::new(Arc::new(PgLeadStore::migrated(pool).await?));

    let page = intake.list(brand, limit).await?;
    if page.leads.is_empty() {
        println!("no leads found");
        return Ok(());
    }

    println!("{:<22}{:<15}{:<24}{:<12}NAME", "SUBMITTED", "BRAND", "SERVICE", "SOURCE");
    for lead in &page.leads {
        println!(
            "{:<22}{:<15}{:<24}{:<12}{}",
            lead.timestamp.format("%Y-%m-%d %H:%M"),
            lead.brand_id,
            lead.service_type,
            lead.source.as_deref().unwrap_or("direct"),
            lead.name
        );
    }
    println!("showing {} of {}", page.leads.len(), page.total);
    Ok(())
}
