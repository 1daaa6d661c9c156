//! Locale registry.
//!
//! # Responsibilities
//! - Hold the base locale and the configured locale set
//! - Membership test (`is_locale`) and assertion (`assert_is_locale`)
//!
//! # Design Decisions
//! - `Locale` values are only minted here, so holding one proves membership
//! - Locale order is the configured order and is used wherever the runtime
//!   has to pick between locales

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{LocaleError, Result};

/// A configured locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(Arc<str>);

impl Locale {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The base locale plus the full locale set.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    base: Locale,
    locales: Vec<Locale>,
}

impl LocaleRegistry {
    /// Build a registry. `base` must be one of `locales`; validated
    /// configuration guarantees this.
    pub fn new<S: AsRef<str>>(base: &str, locales: &[S]) -> Result<Self> {
        let locales: Vec<Locale> = locales
            .iter()
            .map(|l| Locale(Arc::from(l.as_ref())))
            .collect();
        let base = locales
            .iter()
            .find(|l| l.as_str() == base)
            .cloned()
            .ok_or_else(|| LocaleError::InvalidLocale {
                value: base.to_string(),
                expected: join(&locales),
            })?;
        Ok(Self { base, locales })
    }

    pub fn base_locale(&self) -> &Locale {
        &self.base
    }

    /// All locales in configured order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// True if `value` is a configured locale. Empty input is never a locale.
    pub fn is_locale(&self, value: &str) -> bool {
        !value.is_empty() && self.locales.iter().any(|l| l.as_str() == value)
    }

    /// Return the configured locale equal to `value`, or fail naming the
    /// valid set.
    pub fn assert_is_locale(&self, value: &str) -> Result<Locale> {
        if value.is_empty() {
            return Err(self.invalid(value));
        }
        self.locales
            .iter()
            .find(|l| l.as_str() == value)
            .cloned()
            .ok_or_else(|| self.invalid(value))
    }

    fn invalid(&self, value: &str) -> LocaleError {
        LocaleError::InvalidLocale {
            value: value.to_string(),
            expected: join(&self.locales),
        }
    }
}

fn join(locales: &[Locale]) -> String {
    locales
        .iter()
        .map(Locale::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LocaleRegistry {
        LocaleRegistry::new("en", &["en", "de"]).unwrap()
    }

    #[test]
    fn test_is_locale() {
        let registry = registry();
        for locale in registry.locales() {
            assert!(registry.is_locale(locale.as_str()));
        }
        assert!(!registry.is_locale("fr"));
        assert!(!registry.is_locale(""));
        assert!(!registry.is_locale("EN"));
    }

    #[test]
    fn test_assert_is_locale_enumerates_valid_set() {
        let err = registry().assert_is_locale("fr").unwrap_err();
        assert_eq!(err.to_string(), "Invalid locale: fr. Expected one of: en, de");
    }

    #[test]
    fn test_assert_returns_registered_value() {
        let registry = registry();
        let de = registry.assert_is_locale("de").unwrap();
        assert_eq!(de, "de");
        assert_eq!(registry.base_locale(), &registry.locales()[0]);
    }

    #[test]
    fn test_base_must_be_member() {
        assert!(matches!(
            LocaleRegistry::new("fr", &["en", "de"]),
            Err(LocaleError::InvalidLocale { .. })
        ));
    }
}
