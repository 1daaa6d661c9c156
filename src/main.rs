//! Locale router server.
//!
//! Runs the locale middleware in front of a JSON echo handler so a
//! configuration can be exercised end to end:
//!
//! ```text
//! curl -H 'Host: example.com' http://127.0.0.1:8080/de/about
//! {"locale":"de","path":"/about","alternates":{"de":"/de/about","en":"/about"},...}
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use locale_router::config::{load_config, LocalizationConfig};
use locale_router::observability::{logging, metrics};
use locale_router::{HttpServer, LocaleRuntime};

#[derive(Parser)]
#[command(name = "locale-router")]
#[command(about = "Locale resolution and URL localization server", long_about = None)]
struct Args {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => LocalizationConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }

    logging::init_logging(&logging::default_directive(&config.observability.log_level));
    tracing::info!("locale-router v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = LocaleRuntime::from_config(&config)?;

    tracing::info!(
        base_locale = %runtime.base_locale(),
        locales = runtime.locales().len(),
        strategy = ?runtime.strategy(),
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config, runtime);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
