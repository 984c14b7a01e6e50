use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::mcp::sse::DEFAULT_BIND;

#[derive(Parser, Debug)]
#[command(name = "catalyst-center-mcp")]
#[command(about = "MCP server exposing Cisco Catalyst Center as tools over stdio or HTTP")]
#[command(version)]
pub struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Write logs to this file (truncated on start) instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Serve over HTTP with Server-Sent Events instead of stdio
    #[arg(long)]
    pub http: bool,

    /// Address to listen on in HTTP mode [default: 127.0.0.1:8000]
    #[arg(long, value_name = "ADDR", requires = "http")]
    pub bind: Option<SocketAddr>,
}

impl Cli {
    /// Listen address for HTTP mode
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind.unwrap_or(DEFAULT_BIND)
    }
}
