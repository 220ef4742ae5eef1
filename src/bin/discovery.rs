//! Discovery CLI - validate configuration and walk the boot sequence
//!
//! # Examples
//!
//! ```bash
//! # Check the environment and show what was loaded
//! discovery show-config
//!
//! # Walk all boot levels with standalone collaborators
//! discovery boot
//!
//! # Stop after the storage engine stage, JSON report
//! discovery boot --until store-initialized --format json
//! ```
//!
//! Exits with 2 on configuration errors and 1 on stage failures.

use clap::Parser;
use discovery::cli::output::print_error;
use discovery::cli::{exit_code, run, Cli};
use tracing_subscriber::EnvFilter;

fn init_logging(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "discovery=info".into());
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr) // stdout is reserved for command output
        .with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    tracing::debug!("discovery {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(exit_code(e.as_ref()));
    }
}
