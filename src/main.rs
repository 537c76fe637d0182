use central_asia_map::{config, geodata, render};

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build geodata.json from the country borders
    Geodata {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Embed an existing geodata.json into the HTML viewer
    Html {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Run both steps
    Build {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Geodata { config } => {
            let app_config = config::AppConfig::load_or_default(config)?;
            geodata::build_geodata(&app_config)?;
        }
        Commands::Html { config } => {
            let app_config = config::AppConfig::load_or_default(config)?;
            render::generate_page(&app_config)?;
        }
        Commands::Build { config } => {
            let app_config = config::AppConfig::load_or_default(config)?;
            let report = geodata::build_geodata(&app_config)?;
            let html = render::generate_page(&app_config)?;
            info!(geodata = ?report.path, html = ?html, "Generation complete!");
        }
    }

    Ok(())
}
