//! String service (v1)
//!
//! An uppercase/count service built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ transport logging ──▶ endpoint adapter
//!                                                                │
//!                                                                ▼
//!                     instrumenting ──▶ logging ──▶ proxying ──▶ core
//!                                                      │
//!                                                      ▼ (when peers are configured)
//!                                        retry ──▶ round robin ──▶ peer /uppercase
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Instrument;

use stringsvc::config::{read_config, validate_config, ConfigError, ServiceConfig};
use stringsvc::lifecycle::{self, signals::spawn_signal_handler, Shutdown};
use stringsvc::load_balancer::PeerSet;
use stringsvc::observability::{init_tracing, process_span};

#[derive(Parser, Debug)]
#[command(name = "stringsvc")]
#[command(about = "Uppercase and count strings over HTTP", long_about = None)]
struct Args {
    /// HTTP listen address (":8080" binds all interfaces).
    #[arg(long)]
    listen: Option<String>,

    /// Comma-separated list of peers to proxy uppercase requests to.
    #[arg(long)]
    proxy: Option<String>,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// `":8080"` means every interface, as in the usual listen flag syntax.
fn normalize_listen(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

fn resolve_config(args: Args) -> Result<ServiceConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(listen) = args.listen {
        config.listener.bind_address = normalize_listen(&listen);
    }
    if let Some(proxy) = args.proxy {
        config.proxy.peers = PeerSet::parse(&proxy).iter().map(str::to_string).collect();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match resolve_config(Args::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&config.observability) {
        eprintln!("error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    tracing::info!(
        transport = "HTTP",
        addr = %config.listener.bind_address,
        peers = config.proxy.peers.len(),
        metrics = config.observability.metrics_enabled,
        "stringsvc v0.1.0 starting"
    );

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let span = process_span(&config.listener.bind_address);
    let result = lifecycle::run(config, shutdown, &span).instrument(span.clone()).await;
    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "exit");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_listen() {
        assert_eq!(normalize_listen(":8080"), "0.0.0.0:8080");
        assert_eq!(normalize_listen("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from(["stringsvc", "--listen", ":8081", "--proxy", "a:1, b:2,,c:3"]);
        let config = resolve_config(args).unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8081");
        assert_eq!(config.proxy.peers, ["a:1", "b:2", "c:3"]);
    }

    #[test]
    fn test_invalid_listen_rejected() {
        let args = Args::parse_from(["stringsvc", "--listen", "not-an-address"]);
        assert!(matches!(resolve_config(args), Err(ConfigError::Validation(errors)) if errors.len() == 1));
    }
}
