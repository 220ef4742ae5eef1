//! Boot command - walk the boot sequence up to a level

use crate::cli::output::{colors, format_duration, print_output};
use crate::cli::OutputFormat;
use crate::core::boot::{BootLevel, BootSequencer};
use crate::core::config::Config;
use crate::core::services::Collaborators;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Arguments for the boot command
#[derive(Args, Debug)]
pub struct BootArgs {
    /// Stop once this level is reached
    #[arg(long, default_value = "activated")]
    pub until: BootLevel,
}

/// Boot result response
#[derive(Debug, Serialize)]
pub struct BootResponse {
    pub level: BootLevel,
    pub target: BootLevel,
    pub indexer_enabled: bool,
    pub searcher_enabled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: f64,
}

/// Execute the boot command
///
/// Returns the stage failure unchanged so the caller can pick the
/// exit status.
pub async fn execute(
    args: BootArgs,
    config: Arc<Config>,
    collaborators: Collaborators,
    cancel: &CancellationToken,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let started_at = Utc::now();
    let start = Instant::now();

    let mut sequencer = BootSequencer::new(Arc::clone(&config), collaborators);
    sequencer.advance_to(cancel, args.until).await?;

    let response = BootResponse {
        level: sequencer.level(),
        target: args.until,
        indexer_enabled: config.indexer.enabled,
        searcher_enabled: config.searcher.enabled,
        started_at,
        finished_at: Utc::now(),
        duration_secs: start.elapsed().as_secs_f64(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} boot level {} in {}",
                colors::success("Reached"),
                colors::level(response.level.as_str()),
                format_duration(response.duration_secs)
            );
        }
        OutputFormat::Json => print_output(&response, format),
    }

    Ok(())
}
