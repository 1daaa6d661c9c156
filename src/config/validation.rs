//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (base locale and override keys reference
//!   configured locales, override groups exist in their pattern)
//! - Compile every URL pattern once so bad patterns fail at load time
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LocalizationConfig → Result<(), Vec<ValidationError>>
//! - Strategy-chain smells (no terminal `baseLocale`) are logged, not rejected

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::LocalizationConfig;
use crate::locale::Strategy;
use crate::pattern::{PatternError, UrlPattern};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("at least one locale must be configured")]
    NoLocales,

    #[error("locale names must not be empty")]
    EmptyLocale,

    #[error("locale `{0}` is configured more than once")]
    DuplicateLocale(String),

    #[error("base locale `{0}` is not one of the configured locales")]
    UnknownBaseLocale(String),

    #[error("cookie name `{0}` is not a valid cookie token")]
    InvalidCookieName(String),

    #[error("strategy chain is empty")]
    EmptyStrategy,

    #[error("url pattern #{index} `{pattern}`: {error}")]
    Pattern {
        index: usize,
        pattern: String,
        error: PatternError,
    },

    #[error("url pattern #{index}: overrides reference unknown locale `{locale}`")]
    UnknownOverrideLocale { index: usize, locale: String },

    #[error("url pattern #{index}: override group `{group}` does not exist in the pattern")]
    UnknownOverrideGroup { index: usize, group: String },

    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &LocalizationConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_locales(config, &mut errors);

    if !is_cookie_token(&config.cookie_name) {
        errors.push(ValidationError::InvalidCookieName(config.cookie_name.clone()));
    }

    validate_strategy(&config.strategy, &mut errors);

    for (index, entry) in config.effective_url_patterns().iter().enumerate() {
        let pattern = match UrlPattern::parse(&entry.pattern) {
            Ok(p) => p,
            Err(error) => {
                errors.push(ValidationError::Pattern {
                    index,
                    pattern: entry.pattern.clone(),
                    error,
                });
                continue;
            }
        };

        for locale in entry.localized_named_groups.keys() {
            if !config.locales.contains(locale) {
                errors.push(ValidationError::UnknownOverrideLocale {
                    index,
                    locale: locale.clone(),
                });
            }
        }

        let groups = entry
            .de_localized_named_groups
            .keys()
            .chain(entry.localized_named_groups.values().flat_map(|g| g.keys()));
        let mut reported = HashSet::new();
        for group in groups {
            if !pattern.has_group(group) && reported.insert(group.clone()) {
                errors.push(ValidationError::UnknownOverrideGroup {
                    index,
                    group: group.clone(),
                });
            }
        }
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.server.bind_address.clone()));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_locales(config: &LocalizationConfig, errors: &mut Vec<ValidationError>) {
    if config.locales.is_empty() {
        errors.push(ValidationError::NoLocales);
    }

    let mut seen = HashSet::new();
    for locale in &config.locales {
        if locale.is_empty() {
            errors.push(ValidationError::EmptyLocale);
        } else if !seen.insert(locale.as_str()) {
            errors.push(ValidationError::DuplicateLocale(locale.clone()));
        }
    }

    if !config.locales.contains(&config.base_locale) {
        errors.push(ValidationError::UnknownBaseLocale(config.base_locale.clone()));
    }
}

fn validate_strategy(chain: &[Strategy], errors: &mut Vec<ValidationError>) {
    let Some(last) = chain.last() else {
        errors.push(ValidationError::EmptyStrategy);
        return;
    };

    if !chain.iter().any(|s| s.always_resolves()) {
        tracing::warn!(
            chain = %crate::locale::strategy::describe_chain(chain),
            "Strategy chain has no terminal `baseLocale`; resolution fails when every strategy abstains"
        );
    } else if !last.always_resolves() {
        tracing::warn!(
            chain = %crate::locale::strategy::describe_chain(chain),
            "`baseLocale` is not the last strategy; strategies after it are never consulted on read"
        );
    }
}

/// RFC 6265 cookie-name token.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            c.is_ascii_graphic()
                && !matches!(
                    c,
                    '(' | ')' | '<' | '>' | '@' | ',' | ';' | ':' | '\\' | '"' | '/' | '[' | ']' | '?' | '=' | '{' | '}'
                )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{GroupOverride, UrlPatternConfig};
    use std::collections::BTreeMap;

    fn config() -> LocalizationConfig {
        LocalizationConfig {
            base_locale: "en".into(),
            locales: vec!["en".into(), "de".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&LocalizationConfig::default()), Ok(()));
        assert_eq!(validate_config(&config()), Ok(()));
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = config();
        config.base_locale = "fr".into();
        config.locales.push("de".into());
        config.cookie_name = "bad name".into();
        config.strategy.clear();
        config.server.request_timeout_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateLocale("de".into()),
                ValidationError::UnknownBaseLocale("fr".into()),
                ValidationError::InvalidCookieName("bad name".into()),
                ValidationError::EmptyStrategy,
                ValidationError::ZeroTimeout,
            ]
        );
    }

    #[test]
    fn test_pattern_errors() {
        let mut config = config();
        config.url_patterns = vec![
            UrlPatternConfig {
                pattern: "/relative/:path".into(),
                de_localized_named_groups: BTreeMap::new(),
                localized_named_groups: BTreeMap::new(),
            },
            UrlPatternConfig {
                pattern: "https://example.com/:locale?/:path*".into(),
                de_localized_named_groups: BTreeMap::from([("lang".into(), GroupOverride::Remove)]),
                localized_named_groups: BTreeMap::from([(
                    "fr".into(),
                    BTreeMap::from([("locale".into(), GroupOverride::Value("fr".into()))]),
                )]),
            },
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(
            errors[0],
            ValidationError::Pattern { index: 0, error: PatternError::Relative, .. }
        ));
        assert_eq!(
            errors[1],
            ValidationError::UnknownOverrideLocale { index: 1, locale: "fr".into() }
        );
        assert_eq!(
            errors[2],
            ValidationError::UnknownOverrideGroup { index: 1, group: "lang".into() }
        );
    }
}
