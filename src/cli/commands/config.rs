//! Config command - show the validated configuration

use crate::cli::output::{colors, print_header, print_output};
use crate::cli::OutputFormat;
use crate::core::config::Config;
use clap::Args;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show derived values and settings at their defaults
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Arc<Config>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => print_human(config, args.all),
        OutputFormat::Json => print_output(config.as_ref(), format),
    }

    Ok(())
}

fn on_off(enabled: bool) -> colored::ColoredString {
    if enabled {
        colors::success("enabled")
    } else {
        colors::dim("disabled")
    }
}

fn print_human(config: &Config, all: bool) {
    print_header("Configuration:");

    println!("  corteza:");
    if all {
        println!("    base_url: {}", config.corteza.base_url);
    }
    println!("    auth: {}", config.corteza.auth_url);
    println!("    discovery_api: {}", config.corteza.discovery_api_url);

    println!("  storage:");
    for address in &config.es.addresses {
        println!("    - {address}");
    }
    if all {
        println!(
            "    retry_on_timeout: {}",
            config.es.enable_retry_on_timeout
        );
        println!(
            "    max_retries: {}",
            colors::number(&config.es.max_retries.to_string())
        );
    }

    println!("  indexer: {}", on_off(config.indexer.enabled));
    println!(
        "    interval: {}s",
        colors::number(&config.indexer.index_interval_secs.to_string())
    );
    for schema in &config.indexer.schemas {
        println!(
            "    {}: key={} secret={}",
            colors::scope(schema.scope.as_str()),
            schema.client_key,
            schema.client_secret
        );
    }

    println!("  searcher: {}", on_off(config.searcher.enabled));
    if config.searcher.enabled || all {
        println!("    http_addr: {}", config.http_server.addr);
        if let Some(key) = &config.searcher.client_key {
            println!("    client_key: {key}");
        }
        println!(
            "    jwt_secret: {}",
            if config.searcher.jwt_secret.is_some() {
                "set"
            } else {
                "not set"
            }
        );
    }
}
