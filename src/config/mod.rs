//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, or JSON by extension)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, pattern compilation)
//!     → LocalizationConfig (validated, immutable)
//!     → LocaleRuntime::from_config (compiled once, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::GroupOverride;
pub use schema::LocalizationConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
pub use schema::UrlPatternConfig;
pub use validation::ValidationError;
