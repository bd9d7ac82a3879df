//! Handler for `bizscout analyze`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bizscout_core::AppConfig;
use bizscout_pipeline::{Pipeline, PipelineSettings, RunReport, Sources};

/// Run the pipeline once and emit the report as pretty JSON.
///
/// # Errors
///
/// Returns an error if the niches file cannot be loaded, a source client
/// cannot be built, the niche is unknown, discovery is unavailable, or the
/// report cannot be written.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    niche: &str,
    location: &str,
    max_results: usize,
    output: Option<&Path>,
    with_analysis: bool,
) -> anyhow::Result<()> {
    let registry = bizscout_core::load_niches(&config.niches_path).with_context(|| {
        format!("failed to load niches from {}", config.niches_path.display())
    })?;
    let sources = Sources::from_config(config, with_analysis)
        .context("failed to initialize source clients")?;
    let pipeline = Pipeline::new(
        Arc::new(registry),
        sources,
        PipelineSettings::from_config(config),
    );

    let report = pipeline.run(niche, location, max_results).await?;
    write_report(&report, output)
}

fn write_report(report: &RunReport, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                records = report.records.len(),
                "report written"
            );
        }
        None => println!("{json}"),
    }
    Ok(())
}
