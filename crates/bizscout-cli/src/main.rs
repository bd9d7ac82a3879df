mod analyze;
mod niches;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bizscout")]
#[command(about = "Local business intelligence from map listings, websites, and social profiles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Discover and enrich businesses for one niche in one location
    Analyze {
        /// Niche key from the niches file (e.g., medspas)
        #[arg(long)]
        niche: String,
        /// Free-text location (e.g., "Miami, FL")
        #[arg(long)]
        location: String,
        /// Maximum number of businesses to return (capped at 50)
        #[arg(long, default_value = "20")]
        max_results: usize,
        /// Write the JSON report to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Skip AI analysis and website grading even when an analyzer is configured
        #[arg(long)]
        no_analysis: bool,
    },
    /// List configured niches
    Niches,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loads `.env` before reading the environment.
    let config = bizscout_core::load_app_config()?;

    // stdout is reserved for the JSON report.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Analyze {
            niche,
            location,
            max_results,
            output,
            no_analysis,
        }) => {
            analyze::run_analyze(
                &config,
                &niche,
                &location,
                max_results,
                output.as_deref(),
                !no_analysis,
            )
            .await?;
        }
        Some(Commands::Niches) => niches::run_niches(&config)?,
        None => println!("bizscout: run `bizscout --help` for usage"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
