//! Terminal WebSocket chat client.
//!
//! Connects to a WebSocket endpoint, sends every entered line as a text
//! frame and prints every incoming text frame on its own line.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tayori-client
//! cargo run --bin tayori-client -- --url ws://127.0.0.1:5500
//! cargo run --bin tayori-client -- --config tayori.json
//! ```

use std::path::PathBuf;

use clap::Parser;

use tayori_client::{ClientConfig, run_client};
use tayori_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "tayori-client")]
#[command(about = "Minimal WebSocket chat client", long_about = None)]
struct Args {
    /// WebSocket endpoint URL (ws:// or wss://); overrides --config [default: ws://localhost:8080]
    #[arg(short = 'u', long)]
    url: Option<String>,

    /// JSON configuration file of the form {"endpointUrl": "ws://..."}
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Invalid configuration is fatal before any connection is attempted
    let config = match ClientConfig::resolve(args.url, args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
