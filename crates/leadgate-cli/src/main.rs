mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "leadgate")]
#[command(about = "Lead routing command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List configured brands in lookup order.
    Brands,
    /// Resolve the brand serving a ZIP and/or state.
    Brand {
        #[arg(long)]
        zip: Option<String>,
        #[arg(long)]
        state: Option<String>,
    },
    /// Run the ZIP router on free text (ZIP or street address).
    Route { input: String },
    /// Show current conditions and widget copy for a ZIP.
    Weather {
        #[arg(long, default_value = "27601")]
        zip: String,
    },
    /// List recent leads from the configured database.
    Leads {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = leadgate_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Brands) => commands::run_brands(&config)?,
        Some(Commands::Brand { zip, state }) => {
            commands::run_brand(&config, zip.as_deref(), state.as_deref())?;
        }
        Some(Commands::Route { input }) => commands::run_route(&config, &input).await?,
        Some(Commands::Weather { zip }) => commands::run_weather(&config, &zip).await?,
        Some(Commands::Leads { brand, limit }) => {
            commands::run_leads(&config, brand.as_deref(), limit).await?;
        }
        None => println!("leadgate: run with --help to list commands"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
