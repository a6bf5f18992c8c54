//! paperless-mcp binary.
//!
//! Reads connection settings from flags or the environment, checks that the
//! document service is reachable, loads the metadata cache and serves MCP on
//! stdin/stdout.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use paperless_mcp::{
    McpServer, McpSession, MetadataCache, PaperlessApi, PaperlessClient, PaperlessConfig, Result,
    DEFAULT_TIMEOUT_SECS,
};

/// MCP server for Paperless-NGX.
#[derive(Parser, Debug)]
#[command(name = "paperless-mcp", version, about)]
struct Cli {
    /// Base URL of the Paperless-NGX instance
    #[arg(long, env = "PAPERLESS_URL")]
    url: Option<String>,

    /// API token
    #[arg(long, env = "PAPERLESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, env = "PAPERLESS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Skip the startup reachability check
    #[arg(long)]
    skip_connection_check: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout is reserved for protocol frames
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = PaperlessConfig::new(cli.url.as_deref(), cli.token.as_deref(), cli.timeout_secs)?;
    let client = Arc::new(PaperlessClient::new(&config)?);

    if !cli.skip_connection_check {
        client.ping().await?;
        info!(url = %config.base_url, "document service reachable");
    }

    let session = McpSession::new(client, Arc::new(MetadataCache::new()));
    session.initialize().await?;

    McpServer::new(session).run().await
}
