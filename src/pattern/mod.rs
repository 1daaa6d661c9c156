//! URL pattern subsystem.
//!
//! # Data Flow
//! ```text
//! Pattern string (from config)
//!     → tokenizer.rs (literals + named groups with modifiers)
//!     → compiler.rs (split into URL components, one regex each)
//!     → UrlPattern (immutable, compiled once)
//!
//! Per URL:
//!     UrlPattern::exec  (matcher.rs) → NamedGroups | no match
//!     UrlPattern::fill  (filler.rs)  → Url | PatternError
//! ```
//!
//! # Design Decisions
//! - Supported syntax is exactly `:name`, `:name?`, `:name+`, `:name*` and
//!   `:name(regex)`; anything else fails at compile time
//! - Names start with `[A-Za-z_]` and continue with `[A-Za-z0-9_]`; a `:`
//!   before a digit is a literal colon (port separator)
//! - Components are matched independently and their groups merged

use thiserror::Error;

pub mod compiler;
pub mod filler;
pub mod matcher;
pub mod tokenizer;

pub use compiler::{ComponentKind, UrlPattern};
pub use filler::{FillValues, GroupValue};
pub use matcher::NamedGroups;
pub use tokenizer::Modifier;

/// Errors from compiling or filling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern must be absolute (start with a protocol such as `https:`)")]
    Relative,

    #[error("trailing escape character at offset {pos}")]
    TrailingEscape { pos: usize },

    #[error("unnamed regex group at offset {pos}; give the group a name starting with a letter or `_` (`:name(...)`)")]
    AnonymousGroup { pos: usize },

    #[error("unsupported pattern syntax `{found}` at offset {pos}")]
    Unsupported { pos: usize, found: char },

    #[error("unterminated regex for group at offset {pos}")]
    UnterminatedRegex { pos: usize },

    #[error("empty regex for group at offset {pos}")]
    EmptyRegex { pos: usize },

    #[error("duplicate group `{name}` in {component}")]
    DuplicateGroup { component: ComponentKind, name: String },

    #[error("invalid regex in {component}: {message}")]
    InvalidRegex { component: ComponentKind, message: String },

    #[error("Missing value for \"{name}\"{}", repeated_suffix(.repeated))]
    MissingValue { name: String, repeated: bool },

    #[error("filled pattern is not a valid URL: {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

fn repeated_suffix(repeated: &bool) -> &'static str {
    if *repeated {
        " (one or more required)"
    } else {
        ""
    }
}
