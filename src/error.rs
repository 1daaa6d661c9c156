//! Runtime error definitions.

use thiserror::Error;

use crate::pattern::PatternError;

/// Errors raised by locale resolution and URL localization.
///
/// Every variant is a configuration or programming error; none of them is
/// transient and nothing retries them.
#[derive(Debug, Error)]
pub enum LocaleError {
    /// A value that is not one of the configured locales.
    #[error("Invalid locale: {value}. Expected one of: {expected}")]
    InvalidLocale { value: String, expected: String },

    /// Every strategy in the chain abstained.
    #[error("No locale found: every strategy in [{chain}] abstained. Add `baseLocale` as the last strategy")]
    NoLocaleFound { chain: String },

    /// No strategy in the chain could store the new locale.
    #[error(
        "No strategy was able to set the locale. Browser-bound strategies such as `cookie` need a cookie store; install a locale setter for server-side use"
    )]
    NoStrategyCanSet,

    /// No configured URL pattern matches.
    #[error("No match found for {url}")]
    NoMatch { url: String },

    /// A URL or href that could not be parsed.
    #[error("Invalid URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

pub type Result<T, E = LocaleError> = std::result::Result<T, E>;
