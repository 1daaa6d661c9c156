//! Href localization.
//!
//! Hrefs are resolved against [`LocaleRuntime::get_url_origin`]. When the
//! input is root-relative and the result stays on the same origin, the
//! output is relative too.

use url::{Position, Url};

use crate::error::{LocaleError, Result};
use crate::runtime::LocaleRuntime;

impl LocaleRuntime {
    /// Localize `href` into `locale`, or into the active locale when `None`.
    ///
    /// ```text
    /// localize_href("/about", Some("de"))  => "/de/about"
    /// ```
    ///
    /// An absolute URL is returned when the localized href would leave the
    /// current origin, or when the active locale's form of the same href
    /// lives on a different origin than the requested one.
    pub fn localize_href(&self, href: &str, locale: Option<&str>) -> Result<String> {
        let locale = match locale {
            Some(value) => self.assert_is_locale(value)?,
            None => self.get_locale()?,
        };
        let url = self.resolve_href(href)?;
        let localized = self.localize_url(&url, &locale)?;

        if href.starts_with('/') && url.origin() == localized.origin() {
            let current = self.get_locale()?;
            if locale != current {
                let localized_current = self.localize_url(&url, &current)?;
                if localized_current.origin() != localized.origin() {
                    return Ok(localized.into());
                }
            }
            return Ok(relative(&localized));
        }
        Ok(localized.into())
    }

    /// De-localize `href`, keeping root-relative hrefs relative when the
    /// origin does not change.
    pub fn de_localize_href(&self, href: &str) -> Result<String> {
        let url = self.resolve_href(href)?;
        let canonical = self.de_localize_url(&url)?;

        if href.starts_with('/') && url.origin() == canonical.origin() {
            return Ok(relative(&canonical));
        }
        Ok(canonical.into())
    }

    #[deprecated(note = "use `localize_href`")]
    pub fn localize_path(&self, href: &str, locale: Option<&str>) -> Result<String> {
        self.localize_href(href, locale)
    }

    #[deprecated(note = "use `de_localize_href`")]
    pub fn de_localize_path(&self, href: &str) -> Result<String> {
        self.de_localize_href(href)
    }

    fn resolve_href(&self, href: &str) -> Result<Url> {
        let base = Self::parse_url(&self.get_url_origin())?;
        base.join(href).map_err(|source| LocaleError::InvalidUrl {
            input: href.to_string(),
            source,
        })
    }
}

/// Path, query and fragment.
fn relative(url: &Url) -> String {
    url[Position::BeforePath..].to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::config::{GroupOverride, LocalizationConfig, UrlPatternConfig};
    use crate::locale::Strategy;
    use crate::runtime::{LocaleRuntime, RequestContext};

    fn runtime(patterns: Vec<UrlPatternConfig>) -> std::sync::Arc<LocaleRuntime> {
        let config = LocalizationConfig {
            locales: vec!["en".into(), "de".into()],
            strategy: vec![Strategy::GlobalVariable, Strategy::BaseLocale],
            url_patterns: patterns,
            ..Default::default()
        };
        LocaleRuntime::from_config(&config).unwrap()
    }

    fn domain_patterns() -> Vec<UrlPatternConfig> {
        vec![UrlPatternConfig {
            pattern: ":protocol://:domain(.*)/:path(.*)?".into(),
            de_localized_named_groups: BTreeMap::from([("domain".to_string(), GroupOverride::Value("example.com".into()))]),
            localized_named_groups: BTreeMap::from([
                (
                    "en".to_string(),
                    BTreeMap::from([("domain".to_string(), GroupOverride::Value("example.com".into()))]),
                ),
                (
                    "de".to_string(),
                    BTreeMap::from([("domain".to_string(), GroupOverride::Value("de.example.com".into()))]),
                ),
            ]),
        }]
    }

    #[test]
    fn test_relative_href_stays_relative() {
        let runtime = runtime(Vec::new());
        assert_eq!(runtime.localize_href("/about", Some("de")).unwrap(), "/de/about");
        assert_eq!(runtime.localize_href("/de/about?x=1", Some("en")).unwrap(), "/about?x=1");
        assert_eq!(runtime.de_localize_href("/de/about").unwrap(), "/about");
    }

    #[test]
    fn test_href_uses_active_locale() {
        let runtime = runtime(Vec::new());
        runtime.set_locale("de").unwrap();
        assert_eq!(runtime.localize_href("/about", None).unwrap(), "/de/about");
    }

    #[test]
    fn test_absolute_href_stays_absolute() {
        let runtime = runtime(Vec::new());
        assert_eq!(
            runtime.localize_href("https://example.com/about", Some("de")).unwrap(),
            "https://example.com/de/about"
        );
    }

    #[test]
    fn test_cross_origin_localization_is_absolute() {
        let runtime = runtime(domain_patterns());
        let de = runtime.assert_is_locale("de").unwrap();
        let href = RequestContext::new(de, "https://de.example.com")
            .sync_scope(|| runtime.localize_href("/about", Some("en")).unwrap());
        assert_eq!(href, "https://example.com/about");

        let href = RequestContext::new(runtime.base_locale().clone(), "https://example.com")
            .sync_scope(|| runtime.localize_href("/about", Some("en")).unwrap());
        assert_eq!(href, "/about");
    }

    #[test]
    fn test_switching_away_from_other_origin_locale_is_absolute() {
        let config = LocalizationConfig {
            locales: vec!["en".into(), "de".into()],
            strategy: vec![Strategy::GlobalVariable, Strategy::BaseLocale],
            url_patterns: domain_patterns(),
            ..Default::default()
        };
        let runtime = LocaleRuntime::builder(&config)
            .unwrap()
            .with_origin_provider(|| "https://example.com".to_string())
            .build();
        runtime.set_locale("de").unwrap();

        assert_eq!(runtime.localize_href("/about", Some("en")).unwrap(), "https://example.com/about");
        assert_eq!(runtime.localize_href("/about", Some("de")).unwrap(), "https://de.example.com/about");
    }

    #[test]
    fn test_invalid_explicit_locale() {
        let runtime = runtime(Vec::new());
        assert!(runtime.localize_href("/about", Some("fr")).is_err());
    }

    #[test]
    #[allow(deprecated)]
    fn test_deprecated_aliases() {
        let runtime = runtime(Vec::new());
        assert_eq!(runtime.localize_path("/about", Some("de")).unwrap(), "/de/about");
        assert_eq!(runtime.de_localize_path("/de/about").unwrap(), "/about");
    }
}
