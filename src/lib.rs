//! Locale resolution and URL localization.
//!
//! # Architecture Overview
//!
//! ```text
//!     config ──▶ LocaleRuntime::builder ──▶ Arc<LocaleRuntime>
//!                                               │
//!          ┌────────────────────────────────────┼───────────────────────┐
//!          ▼                                    ▼                       ▼
//!   runtime::resolve                       localize                 http
//!   get/set locale via the          URL and href rewriting     middleware binding
//!   strategy chain                  over compiled patterns     a RequestContext
//!          │                                    │
//!          ▼                                    ▼
//!   locale (registry, slot,              pattern (tokenize, compile,
//!   strategy, cookie)                    match, fill)
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod locale;
pub mod localize;
pub mod observability;
pub mod pattern;
pub mod runtime;

pub use config::LocalizationConfig;
pub use error::{LocaleError, Result};
pub use http::HttpServer;
pub use locale::{Locale, LocaleRegistry, Strategy};
pub use runtime::{LocaleRuntime, RequestContext, SetLocaleOutcome};
