//! # meshport - Meshery Model Importer
//!
//! The main binary for importing models into a Meshery registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    apps/meshport (THE BINARY)                   │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐     │
//! │  │   CLI       │    │   Source    │    │  Registry Client │     │
//! │  │  (clap)     │    │ (tar/gzip)  │    │    (reqwest)     │     │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘     │
//! │         │                  │                    │               │
//! │         └──────────────────┼────────────────────┘               │
//! │                            ▼                                    │
//! │                    ┌───────────────┐                            │
//! │                    │ meshport-core │                            │
//! │                    │  (THE LOGIC)  │                            │
//! │                    └───────────────┘                            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! meshport model import -f ./model.yaml
//! meshport model import ./csv-export/
//! meshport --url https://meshery.example.com model import https://example.com/model.tar
//! ```

use clap::Parser;
use meshport::cli;
use meshport_core::to_text;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse_from(cli::normalize_args(std::env::args()));

    init_tracing(cli.verbose);

    // Execute command
    let renderer = cli::renderer_for(std::io::stdout().is_terminal());
    if let Err(e) = cli::execute(cli, renderer).await {
        tracing::debug!("Import failed: {:?}", e);
        let renderer = cli::renderer_for(std::io::stderr().is_terminal());
        eprint!("{}", to_text(&renderer.render_error(&e)));
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr; MESHPORT_LOG_FORMAT=json enables machine-parseable output.
fn init_tracing(verbose: bool) {
    let log_format = std::env::var("MESHPORT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let default_filter = if verbose {
        "meshport=debug,meshport_core=debug"
    } else {
        "meshport=warn,meshport_core=warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
