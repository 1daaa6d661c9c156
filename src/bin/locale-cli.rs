use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use locale_router::config::{load_config, LocalizationConfig};
use locale_router::observability::logging;
use locale_router::LocaleRuntime;

#[derive(Parser)]
#[command(name = "locale-cli")]
#[command(about = "Offline URL localization against a locale-router configuration", long_about = None)]
struct Cli {
    /// Configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite an absolute URL into a locale
    Localize {
        url: String,
        #[arg(short, long)]
        locale: String,
    },
    /// Rewrite an absolute URL into its canonical form
    Delocalize { url: String },
    /// Print the locale an absolute URL is written in
    Extract { url: String },
    /// Localize (or de-localize) an href against an origin
    Href {
        href: String,
        /// Target locale; the base locale when omitted
        #[arg(short, long)]
        locale: Option<String>,
        #[arg(short, long, default_value = "http://localhost")]
        origin: String,
        #[arg(short, long)]
        delocalize: bool,
    },
    /// Validate the configuration and print a summary
    Check,
}

fn main() -> ExitCode {
    logging::init_logging("warn");
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => LocalizationConfig::default(),
    };

    let output = match cli.command {
        Commands::Localize { url, locale } => {
            let runtime = LocaleRuntime::from_config(&config)?;
            let locale = runtime.assert_is_locale(&locale)?;
            runtime.localize_url(&LocaleRuntime::parse_url(&url)?, &locale)?.to_string()
        }
        Commands::Delocalize { url } => {
            let runtime = LocaleRuntime::from_config(&config)?;
            runtime.de_localize_url(&LocaleRuntime::parse_url(&url)?)?.to_string()
        }
        Commands::Extract { url } => {
            let runtime = LocaleRuntime::from_config(&config)?;
            match runtime.extract_locale_from_url(&LocaleRuntime::parse_url(&url)?) {
                Some(locale) => locale.to_string(),
                None => return Err(format!("No locale found for {url}").into()),
            }
        }
        Commands::Href {
            href,
            locale,
            origin,
            delocalize,
        } => {
            let runtime: Arc<LocaleRuntime> = LocaleRuntime::builder(&config)?
                .with_origin_provider(move || origin.clone())
                .build();
            if delocalize {
                runtime.de_localize_href(&href)?
            } else {
                let locale = locale.unwrap_or_else(|| runtime.base_locale().to_string());
                runtime.localize_href(&href, Some(locale.as_str()))?
            }
        }
        Commands::Check => {
            let runtime = LocaleRuntime::from_config(&config)?;
            let patterns: Vec<&str> = runtime
                .localizer()
                .entries()
                .iter()
                .map(|entry| entry.pattern().as_str())
                .collect();
            serde_json::to_string_pretty(&json!({
                "status": "ok",
                "base_locale": runtime.base_locale(),
                "locales": runtime.locales(),
                "cookie_name": runtime.cookie_name(),
                "strategy": runtime.strategy(),
                "url_patterns": patterns,
            }))?
        }
    };
    Ok(output)
}
