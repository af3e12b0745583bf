//! # Switchboard Notes Demo
//!
//! A small notebook served over MCP. Run it over stdio for desktop clients,
//! or over HTTP for anything that speaks the session-keyed transport:
//!
//! ```text
//! switchboard-demo stdio
//! switchboard-demo http --port 8641
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for per-request detail.

mod notes;

use std::net::SocketAddr;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use switchboard_transport::{HttpMcpServer, StdioTransport};

use crate::notes::NoteStore;

#[derive(Parser, Debug)]
#[command(name = "switchboard-demo")]
#[command(about = "Notes server demonstrating Switchboard tools, resources and prompts")]
struct Args {
    #[command(subcommand)]
    transport: Transport,
}

#[derive(Subcommand, Debug)]
enum Transport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    Stdio,
    /// Session-keyed JSON-RPC over HTTP POST
    Http {
        /// Port to bind the server to
        #[arg(short, long, default_value = "8641")]
        port: u16,

        /// Address to bind the server to
        #[arg(long, default_value = "127.0.0.1")]
        host: std::net::IpAddr,

        /// Close sessions idle for this many seconds
        #[arg(long, default_value = "1800")]
        idle_timeout: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the protocol when running over stdio
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let server = notes::server(NoteStore::new())?;

    match args.transport {
        Transport::Stdio => {
            info!("Serving notes over stdio");
            StdioTransport::new(server.service()).run_stdio().await?;
        }
        Transport::Http {
            port,
            host,
            idle_timeout,
        } => {
            let http = HttpMcpServer::builder()
                .service(server.service())
                .bind_address(SocketAddr::new(host, port))
                .session_idle_timeout(Duration::from_secs(idle_timeout))
                .build()?;

            info!("Serving notes at http://{}:{}/mcp", host, port);
            http.run().await?;
        }
    }

    Ok(())
}
