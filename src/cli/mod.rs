//! CLI adapter for the discovery boot sequence
//!
//! Loads configuration, then either prints it or walks the boot
//! sequence with the standalone collaborators as a preflight check.
//!
//! # Architecture
//!
//! ```text
//!              +------------------+
//!              |     core/        |
//!              | config  +  boot  |
//!              +--------+---------+
//!                       |
//!                       v
//!              +------------------+
//!              |      cli/        |
//!              | (clap adapter)   |
//!              +------------------+
//! ```

pub mod commands;
pub mod output;

use crate::core::config::Config;
use crate::core::error::DiscoveryError;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Discovery - boot sequencer for the discovery indexer and searcher
///
/// Validates the environment-provided configuration and walks the
/// startup stages in dependency order.
#[derive(Parser, Debug)]
#[command(name = "discovery")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Discovery indexer boot sequencer", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Read variables from this file instead of ./.env
    #[arg(long, global = true, env = "DISCOVERY_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate and show the loaded configuration (secrets redacted)
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Walk the boot sequence with standalone collaborators
    Boot(commands::BootArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  discovery completions bash > ~/.local/share/bash-completion/completions/discovery
    ///   zsh:   discovery completions zsh > ~/.zfunc/_discovery
    ///   fish:  discovery completions fish > ~/.config/fish/completions/discovery.fish
    Completions(commands::CompletionsArgs),
}

/// Load configuration, from `env_file` when given
pub fn load_config(env_file: Option<&Path>) -> Result<Config, DiscoveryError> {
    match env_file {
        Some(path) => Config::load_with_env_file(path),
        None => Config::load(),
    }
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::services::Collaborators;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    // Handle completions command early (doesn't need configuration)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let config = Arc::new(load_config(cli.env_file.as_deref())?);

    match cli.command {
        Commands::ShowConfig(args) => commands::config::execute(args, &config, cli.format).await,
        Commands::Boot(args) => {
            config.log_config();

            let cancel = CancellationToken::new();
            let interrupt = cancel.clone();
            let listener = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, cancelling boot");
                    interrupt.cancel();
                }
            });

            let result = commands::boot::execute(
                args,
                config,
                Collaborators::standalone(),
                &cancel,
                cli.format,
            )
            .await;
            listener.abort();
            result
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}

/// Process exit status for an error returned by [`run`]
pub fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    err.downcast_ref::<DiscoveryError>()
        .map(DiscoveryError::exit_code)
        .unwrap_or(1)
}
