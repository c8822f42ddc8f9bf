#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for rendering and serving accident map dashboards.

use std::path::{Path, PathBuf};

use accident_map_dashboard::{Dashboard, page, server};
use accident_map_dataset::DatasetContext;
use accident_map_dataset::registry::{all_sources, source_by_id};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "accident_map", about = "Accident map dashboards")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered map sources
    Sources,
    /// Write a dashboard as a static HTML page
    Render {
        /// Map source ID
        #[arg(long)]
        source: String,
        /// Directory that relative input paths resolve against
        #[arg(long, default_value = "Data")]
        data_dir: PathBuf,
        /// Output file (defaults to `<source>.html`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve a dashboard over HTTP
    Serve {
        /// Map source ID
        #[arg(long)]
        source: String,
        /// Directory that relative input paths resolve against
        #[arg(long, default_value = "Data")]
        data_dir: PathBuf,
    },
}

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Sources => {
            for source in all_sources() {
                println!("{:<20} {}", source.id, source.title);
            }
        }
        Commands::Render {
            source,
            data_dir,
            output,
        } => {
            let dashboard = load_dashboard(&source, &data_dir).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{source}.html")));
            std::fs::write(&output, page::render(&dashboard)?)?;
            log::info!("Wrote {}", output.display());
        }
        Commands::Serve { source, data_dir } => {
            let dashboard = load_dashboard(&source, &data_dir).await?;
            server::serve(dashboard).await?;
        }
    }

    Ok(())
}

async fn load_dashboard(
    id: &str,
    data_dir: &Path,
) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let source = source_by_id(id)?;
    let client = reqwest::Client::new();
    let ctx = DatasetContext::load(source, data_dir, &client).await?;
    Ok(Dashboard::build(&ctx)?)
}
