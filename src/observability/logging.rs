//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for the binaries
//! - Honor `RUST_LOG` over the configured level
//!
//! # Design Decisions
//! - Uses the tracing crate throughout; the library never installs a
//!   subscriber on its own
//! - Initialization is idempotent so tests and the CLI can call it freely

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `default_directive` applies when
/// `RUST_LOG` is unset, e.g. `"info"` or `"locale_router=debug"`.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// The directive used when the configured level is empty.
pub fn default_directive(level: &str) -> String {
    if level.trim().is_empty() {
        "info".to_string()
    } else {
        format!("{level},tower_http={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(""), "info");
        assert_eq!(default_directive("debug"), "debug,tower_http=debug");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging("warn");
        init_logging("warn");
    }
}
