//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the locale
//! runtime and its server. All types derive Serde traits for
//! deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::locale::Strategy;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Fallback locale; must be one of `locales`.
    #[serde(alias = "baseLocale")]
    pub base_locale: String,

    /// All supported locales, in preference order.
    pub locales: Vec<String>,

    /// Name of the locale cookie.
    #[serde(alias = "cookieName")]
    pub cookie_name: String,

    /// Strategy chain, evaluated in order.
    pub strategy: Vec<Strategy>,

    /// URL patterns, first match wins. Empty means one locale-prefix
    /// pattern derived from `locales` (see [`UrlPatternConfig::locale_prefix`]).
    #[serde(alias = "urlPatterns")]
    pub url_patterns: Vec<UrlPatternConfig>,

    /// Server settings for the `locale-router` binary.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            base_locale: "en".to_string(),
            locales: vec!["en".to_string()],
            cookie_name: "LOCALE".to_string(),
            strategy: vec![Strategy::Cookie, Strategy::GlobalVariable, Strategy::BaseLocale],
            url_patterns: Vec::new(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl LocalizationConfig {
    /// The configured patterns, or the derived locale-prefix pattern when
    /// none are configured.
    pub fn effective_url_patterns(&self) -> Vec<UrlPatternConfig> {
        if self.url_patterns.is_empty() {
            vec![UrlPatternConfig::locale_prefix(&self.base_locale, &self.locales)]
        } else {
            self.url_patterns.clone()
        }
    }
}

/// A declarative URL pattern with its override rules.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UrlPatternConfig {
    /// URL pattern with named groups, e.g.
    /// `:protocol://:domain(.*)::port?/:locale(de)?/:path(.*)?`.
    pub pattern: String,

    /// Group overrides producing the canonical (de-localized) URL.
    #[serde(default, alias = "deLocalizedNamedGroups")]
    pub de_localized_named_groups: BTreeMap<String, GroupOverride>,

    /// Group overrides per locale.
    #[serde(default, alias = "localizedNamedGroups")]
    pub localized_named_groups: BTreeMap<String, BTreeMap<String, GroupOverride>>,
}

impl UrlPatternConfig {
    /// Prefix every non-base locale as the first path segment and leave the
    /// base locale unprefixed.
    pub fn locale_prefix(base_locale: &str, locales: &[String]) -> Self {
        let prefixed: Vec<&str> = locales
            .iter()
            .map(String::as_str)
            .filter(|l| *l != base_locale)
            .collect();

        let pattern = if prefixed.is_empty() {
            ":protocol://:domain(.*)::port?/:path(.*)?".to_string()
        } else {
            let alternatives: Vec<String> = prefixed.iter().map(|l| regex::escape(l)).collect();
            format!(
                ":protocol://:domain(.*)::port?/:locale({})?/:path(.*)?",
                alternatives.join("|")
            )
        };

        let mut localized_named_groups = BTreeMap::new();
        let mut de_localized_named_groups = BTreeMap::new();
        if prefixed.is_empty() {
            // Nothing to rewrite, but the base locale still owns every URL.
            localized_named_groups.insert(base_locale.to_string(), BTreeMap::new());
        } else {
            de_localized_named_groups.insert("locale".to_string(), GroupOverride::Remove);
            for locale in locales {
                let value = if locale == base_locale {
                    GroupOverride::Remove
                } else {
                    GroupOverride::Value(locale.clone())
                };
                localized_named_groups.insert(
                    locale.clone(),
                    BTreeMap::from([("locale".to_string(), value)]),
                );
            }
        }

        Self {
            pattern,
            de_localized_named_groups,
            localized_named_groups,
        }
    }
}

/// Override value for a named group.
///
/// In JSON, `null` removes the segment. TOML has no null, so `false` is
/// accepted as the removal marker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawGroupOverride", into = "RawGroupOverride")]
pub enum GroupOverride {
    Value(String),
    /// Repeated segments, joined with `/` when filling.
    Segments(Vec<String>),
    /// Remove the segment including its separator.
    Remove,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
enum RawGroupOverride {
    Text(String),
    Segments(Vec<String>),
    Flag(bool),
    Null(()),
}

impl TryFrom<RawGroupOverride> for GroupOverride {
    type Error = String;

    fn try_from(raw: RawGroupOverride) -> Result<Self, Self::Error> {
        match raw {
            RawGroupOverride::Text(value) => Ok(Self::Value(value)),
            RawGroupOverride::Segments(segments) => Ok(Self::Segments(segments)),
            RawGroupOverride::Flag(false) | RawGroupOverride::Null(()) => Ok(Self::Remove),
            RawGroupOverride::Flag(true) => {
                Err("group override `true` is not allowed; use a string, an array or `false`".to_string())
            }
        }
    }
}

impl From<GroupOverride> for RawGroupOverride {
    fn from(value: GroupOverride) -> Self {
        match value {
            GroupOverride::Value(value) => Self::Text(value),
            GroupOverride::Segments(segments) => Self::Segments(segments),
            GroupOverride::Remove => Self::Flag(false),
        }
    }
}

/// Server configuration for the `locale-router` binary.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_false_removes_segment() {
        let config: LocalizationConfig = toml::from_str(
            r#"
            base_locale = "en"
            locales = ["en", "de"]
            strategy = ["url", "baseLocale"]

            [[url_patterns]]
            pattern = ":protocol://:domain(.*)::port?/:locale(de)?/:path(.*)?"
            de_localized_named_groups = { locale = false }

            [url_patterns.localized_named_groups]
            en = { locale = false }
            de = { locale = "de" }
            "#,
        )
        .unwrap();

        let entry = &config.url_patterns[0];
        assert_eq!(entry.de_localized_named_groups["locale"], GroupOverride::Remove);
        assert_eq!(
            entry.localized_named_groups["de"]["locale"],
            GroupOverride::Value("de".into())
        );
        assert_eq!(config.cookie_name, "LOCALE");
        assert_eq!(config.strategy, vec![Strategy::Url, Strategy::BaseLocale]);
    }

    #[test]
    fn test_json_camel_case_and_null() {
        let config: LocalizationConfig = serde_json::from_str(
            r#"{
                "baseLocale": "en",
                "locales": ["en", "de"],
                "cookieName": "PARAGLIDE_LOCALE",
                "urlPatterns": [{
                    "pattern": "https://example.com/:section+",
                    "deLocalizedNamedGroups": { "section": ["docs", "intro"] },
                    "localizedNamedGroups": { "de": { "section": null } }
                }]
            }"#,
        )
        .unwrap();

        let entry = &config.url_patterns[0];
        assert_eq!(
            entry.de_localized_named_groups["section"],
            GroupOverride::Segments(vec!["docs".into(), "intro".into()])
        );
        assert_eq!(entry.localized_named_groups["de"]["section"], GroupOverride::Remove);
        assert_eq!(config.cookie_name, "PARAGLIDE_LOCALE");
    }

    #[test]
    fn test_true_is_rejected() {
        let result: Result<UrlPatternConfig, _> = serde_json::from_str(
            r#"{ "pattern": "https://example.com/", "deLocalizedNamedGroups": { "a": true } }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_locale_prefix_default() {
        let locales = vec!["en".to_string(), "de".to_string(), "fr".to_string()];
        let entry = UrlPatternConfig::locale_prefix("en", &locales);
        assert_eq!(entry.pattern, ":protocol://:domain(.*)::port?/:locale(de|fr)?/:path(.*)?");
        assert_eq!(entry.localized_named_groups["en"]["locale"], GroupOverride::Remove);
        assert_eq!(
            entry.localized_named_groups["fr"]["locale"],
            GroupOverride::Value("fr".into())
        );
    }

    #[test]
    fn test_locale_prefix_single_locale() {
        let entry = UrlPatternConfig::locale_prefix("en", &["en".to_string()]);
        assert_eq!(entry.pattern, ":protocol://:domain(.*)::port?/:path(.*)?");
        assert!(entry.de_localized_named_groups.is_empty());
        assert_eq!(entry.localized_named_groups.len(), 1);
        assert!(entry.localized_named_groups["en"].is_empty());
    }
}
