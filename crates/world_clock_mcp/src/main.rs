//! # World Clock MCP Server
//!
//! A Model Context Protocol server exposing world clock tools backed by the
//! World Time API: current time by zone or IP address, zone listings,
//! side-by-side comparisons and datetime conversion between zones.

use std::env;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod core;
mod server;

use crate::core::api::DEFAULT_TIMEOUT;

/// Command line arguments for the world clock MCP server
#[derive(Parser, Debug)]
#[command(name = "mcp-server-world-clock")]
#[command(about = "MCP server for world clock queries over the World Time API")]
#[command(version)]
struct Args {
    /// Timeout in seconds applied to each World Time API request
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging only if LOG_LEVEL environment variable is set
    if let Ok(log_level) = env::var("LOG_LEVEL") {
        // Initialize the tracing subscriber with file and stdout logging
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
            )
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .init();

        tracing::info!(
            "Starting World Clock MCP server with log level: {}",
            log_level
        );
    }

    let args = Args::parse();

    if let Err(e) = server::run(Duration::from_secs(args.timeout_secs)).await {
        // Only log error if logging is initialized
        if env::var("LOG_LEVEL").is_ok() {
            tracing::error!("Error running World Clock MCP server: {}", e);
        }
        return Err(e);
    }

    Ok(())
}
