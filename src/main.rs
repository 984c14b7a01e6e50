use anyhow::Result;
use clap::Parser;
use log::info;
use std::sync::Arc;

use catalyst_center_mcp::api::CatalystClient;
use catalyst_center_mcp::cli::Cli;
use catalyst_center_mcp::config::Config;
use catalyst_center_mcp::mcp::{self, McpServer};

fn init_logging(cli: &Cli) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    // stdout carries the protocol in stdio mode, logs must never go there
    match &cli.log_file {
        Some(path) => {
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(log_file)));
        }
        None => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    info!("Starting catalyst-center-mcp {}", env!("CARGO_PKG_VERSION"));

    // Configuration errors surface here, before the session starts
    let config = Config::load(cli.env_file.as_deref())?;
    info!("Using Catalyst Center at {}", config.url);

    let client = Arc::new(CatalystClient::new(&config.credentials())?);
    let server = Arc::new(McpServer::new(client));

    if cli.http {
        mcp::serve_sse(server, cli.bind_addr()).await?;
    } else {
        mcp::serve_stdio(server).await?;
    }

    info!("Session closed");
    Ok(())
}
