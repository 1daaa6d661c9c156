//! Locale strategies.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named way of reading and writing the active locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum Strategy {
    /// Locale encoded in the current URL, per the configured patterns.
    Url,
    /// Locale stored in a cookie named by `cookie_name`.
    Cookie,
    /// Process-wide fallback slot.
    GlobalVariable,
    /// The configured base locale. Never abstains.
    BaseLocale,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Cookie => "cookie",
            Self::GlobalVariable => "globalVariable",
            Self::BaseLocale => "baseLocale",
        }
    }

    /// True for strategies that always yield a locale on read.
    pub fn always_resolves(self) -> bool {
        matches!(self, Self::BaseLocale)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "url" => Ok(Self::Url),
            "cookie" => Ok(Self::Cookie),
            "globalVariable" => Ok(Self::GlobalVariable),
            "baseLocale" => Ok(Self::BaseLocale),
            other => Err(format!("Unsupported strategy: {other}")),
        }
    }
}

/// Render a chain as `url, cookie, baseLocale`.
pub fn describe_chain(chain: &[Strategy]) -> String {
    chain.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}
