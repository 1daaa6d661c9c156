//! URL localization and de-localization.
//!
//! # Responsibilities
//! - Find the first pattern entry matching a URL
//! - Rebuild the URL with per-locale or canonical group overrides
//! - Recover the locale a URL is written in
//!
//! # Design Decisions
//! - First match wins; entry order is configuration order
//! - Query and fragment survive rewriting when the pattern does not
//!   constrain them

use url::Url;

use super::entry::{merge_groups, GroupOverrides, PatternEntry};
use crate::config::UrlPatternConfig;
use crate::error::{LocaleError, Result};
use crate::locale::{Locale, LocaleRegistry};
use crate::observability::metrics;
use crate::pattern::{ComponentKind, NamedGroups, PatternError};

/// The ordered list of compiled pattern entries.
#[derive(Debug, Clone)]
pub struct UrlLocalizer {
    entries: Vec<PatternEntry>,
}

impl UrlLocalizer {
    pub fn new(entries: Vec<PatternEntry>) -> Self {
        Self { entries }
    }

    /// Compile configured entries in order.
    pub fn compile(patterns: &[UrlPatternConfig], registry: &LocaleRegistry) -> Result<Self, PatternError> {
        let entries = patterns
            .iter()
            .map(|p| PatternEntry::compile(p, registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// The first entry matching `url`, with its named groups.
    pub fn first_match(&self, url: &Url) -> Option<(&PatternEntry, NamedGroups)> {
        self.entries
            .iter()
            .find_map(|entry| entry.pattern().exec(url).map(|groups| (entry, groups)))
    }

    /// Rewrite `url` into its `locale` form.
    pub fn localize(&self, url: &Url, locale: &Locale) -> Result<Url> {
        let (entry, groups) = self.first_match(url).ok_or_else(|| no_match(url))?;
        let localized = rewrite(entry, url, groups, entry.overrides_for(locale))?;

        metrics::record_rewrite("localize");
        tracing::trace!(from = %url, to = %localized, locale = %locale, "Localized URL");
        Ok(localized)
    }

    /// Rewrite `url` into its canonical, locale-independent form.
    pub fn de_localize(&self, url: &Url) -> Result<Url> {
        let (entry, groups) = self.first_match(url).ok_or_else(|| no_match(url))?;
        let canonical = rewrite(entry, url, groups, Some(entry.de_localized()))?;

        metrics::record_rewrite("delocalize");
        tracing::trace!(from = %url, to = %canonical, "De-localized URL");
        Ok(canonical)
    }

    /// The locale `url` is written in, or `None` if no entry matches or no
    /// locale's overrides agree with the matched groups.
    pub fn extract_locale(&self, url: &Url) -> Option<Locale> {
        self.entries.iter().find_map(|entry| {
            let groups = entry.pattern().exec(url)?;
            entry
                .localized()
                .iter()
                .find(|(_, overrides)| {
                    overrides
                        .iter()
                        .all(|(name, expected)| expected.agrees_with(groups.get(name).and_then(|v| v.as_deref())))
                })
                .map(|(locale, _)| locale.clone())
        })
    }
}

fn no_match(url: &Url) -> LocaleError {
    LocaleError::NoMatch { url: url.to_string() }
}

fn rewrite(
    entry: &PatternEntry,
    input: &Url,
    groups: NamedGroups,
    overrides: Option<&GroupOverrides>,
) -> Result<Url> {
    let values = merge_groups(groups, overrides);
    let mut output = entry.pattern().fill(&values)?;

    if entry.pattern().component(ComponentKind::Search).is_wildcard() {
        output.set_query(input.query());
    }
    if entry.pattern().component(ComponentKind::Hash).is_wildcard() {
        output.set_fragment(input.fragment());
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupOverride;
    use std::collections::BTreeMap;

    fn registry() -> LocaleRegistry {
        LocaleRegistry::new("en", &["en", "de"]).unwrap()
    }

    fn localizer() -> UrlLocalizer {
        let registry = registry();
        let locales = vec!["en".to_string(), "de".to_string()];
        UrlLocalizer::compile(&[UrlPatternConfig::locale_prefix("en", &locales)], &registry).unwrap()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_localize_adds_prefix() {
        let de = registry().assert_is_locale("de").unwrap();
        let localized = localizer().localize(&url("https://example.com/about"), &de).unwrap();
        assert_eq!(localized.as_str(), "https://example.com/de/about");
    }

    #[test]
    fn test_localize_base_removes_prefix() {
        let en = registry().assert_is_locale("en").unwrap();
        let localized = localizer().localize(&url("https://example.com/de/about"), &en).unwrap();
        assert_eq!(localized.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_query_and_fragment_survive() {
        let de = registry().assert_is_locale("de").unwrap();
        let localized = localizer()
            .localize(&url("http://localhost:5173/about?ref=nav#team"), &de)
            .unwrap();
        assert_eq!(localized.as_str(), "http://localhost:5173/de/about?ref=nav#team");
    }

    #[test]
    fn test_extract_locale() {
        let localizer = localizer();
        assert_eq!(localizer.extract_locale(&url("https://example.com/de/x")).unwrap(), "de");
        assert_eq!(localizer.extract_locale(&url("https://example.com/x")).unwrap(), "en");
    }

    #[test]
    fn test_extract_locale_without_agreeing_rule() {
        let registry = registry();
        let entry = UrlPatternConfig {
            pattern: "https://:sub.example.com/:path*".into(),
            de_localized_named_groups: BTreeMap::new(),
            localized_named_groups: BTreeMap::from([(
                "de".to_string(),
                BTreeMap::from([("sub".to_string(), GroupOverride::Value("de".into()))]),
            )]),
        };
        let localizer = UrlLocalizer::compile(&[entry], &registry).unwrap();
        assert_eq!(localizer.extract_locale(&url("https://de.example.com/x")).unwrap(), "de");
        assert_eq!(localizer.extract_locale(&url("https://www.example.com/x")), None);
        assert_eq!(localizer.extract_locale(&url("https://other.org/x")), None);
    }

    #[test]
    fn test_single_locale_owns_every_url() {
        let registry = LocaleRegistry::new("en", &["en"]).unwrap();
        let entry = UrlPatternConfig::locale_prefix("en", &["en".to_string()]);
        let localizer = UrlLocalizer::compile(&[entry], &registry).unwrap();
        let en = registry.assert_is_locale("en").unwrap();

        assert_eq!(localizer.extract_locale(&url("https://example.com/x")).unwrap(), "en");
        assert_eq!(localizer.extract_locale(&url("http://localhost:3000/")).unwrap(), "en");
        let localized = localizer.localize(&url("https://example.com/about"), &en).unwrap();
        assert_eq!(localized.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_no_match_is_an_error() {
        let registry = registry();
        let entry = UrlPatternConfig {
            pattern: "https://example.com/docs/:page".into(),
            de_localized_named_groups: BTreeMap::new(),
            localized_named_groups: BTreeMap::new(),
        };
        let localizer = UrlLocalizer::compile(&[entry], &registry).unwrap();
        let err = localizer.de_localize(&url("https://example.com/blog")).unwrap_err();
        assert_eq!(err.to_string(), "No match found for https://example.com/blog");
    }
}
