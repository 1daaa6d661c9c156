//! URL localization subsystem.
//!
//! # Data Flow
//! ```text
//! UrlPatternConfig list
//!     → entry.rs (compile patterns, order overrides by locale)
//!     → url.rs (first match, merge overrides, fill)
//!     → href.rs (resolve against the origin, relative output)
//! ```

pub mod entry;
pub mod href;
pub mod url;

pub use entry::{GroupOverrides, PatternEntry};
pub use self::url::UrlLocalizer;
