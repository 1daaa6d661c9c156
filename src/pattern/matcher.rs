//! Pattern matching against parsed URLs.
//!
//! # Responsibilities
//! - Extract the eight component strings from a `url::Url`
//! - Match every component independently
//! - Merge all named groups into one flat map
//!
//! # Design Decisions
//! - A single failing component fails the whole match
//! - Groups that did not participate are kept as `None` so that a later
//!   component can overwrite an earlier defined value with "undefined"

use std::collections::BTreeMap;

use url::Url;

use super::compiler::{ComponentKind, UrlPattern};

/// Named groups aggregated across all URL components.
/// `None` marks a group that did not participate in the match.
pub type NamedGroups = BTreeMap<String, Option<String>>;

/// The string a component is matched against.
pub fn component_input(url: &Url, kind: ComponentKind) -> String {
    match kind {
        ComponentKind::Protocol => url.scheme().to_string(),
        ComponentKind::Username => url.username().to_string(),
        ComponentKind::Password => url.password().unwrap_or_default().to_string(),
        ComponentKind::Hostname => url.host_str().unwrap_or_default().to_string(),
        ComponentKind::Port => url.port().map(|p| p.to_string()).unwrap_or_default(),
        ComponentKind::Pathname => url.path().to_string(),
        ComponentKind::Search => url.query().unwrap_or_default().to_string(),
        ComponentKind::Hash => url.fragment().unwrap_or_default().to_string(),
    }
}

impl UrlPattern {
    /// Match `url` against this pattern.
    pub fn exec(&self, url: &Url) -> Option<NamedGroups> {
        let mut matched = Vec::with_capacity(ComponentKind::ALL.len());
        for kind in ComponentKind::ALL {
            let groups = self.component(kind).captures(&component_input(url, kind))?;
            matched.push((kind, groups));
        }

        let mut groups = NamedGroups::new();
        for kind in ComponentKind::AGGREGATION_ORDER {
            if let Some((_, component_groups)) = matched.iter().find(|(k, _)| *k == kind) {
                for (name, value) in component_groups {
                    groups.insert(name.clone(), value.clone());
                }
            }
        }
        Some(groups)
    }

    /// True if `url` matches this pattern.
    pub fn test(&self, url: &Url) -> bool {
        self.exec(url).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn locale_pattern() -> UrlPattern {
        UrlPattern::parse(":protocol://:domain(.*)::port?/:locale(de)?/:path(.*)?").unwrap()
    }

    #[test]
    fn test_matches_unprefixed_path() {
        let groups = locale_pattern().exec(&url("https://example.com/about")).unwrap();
        assert_eq!(groups["protocol"].as_deref(), Some("https"));
        assert_eq!(groups["domain"].as_deref(), Some("example.com"));
        assert_eq!(groups["port"], None);
        assert_eq!(groups["locale"], None);
        assert_eq!(groups["path"].as_deref(), Some("about"));
    }

    #[test]
    fn test_matches_locale_prefix() {
        let groups = locale_pattern().exec(&url("http://localhost:3000/de/blog/post")).unwrap();
        assert_eq!(groups["port"].as_deref(), Some("3000"));
        assert_eq!(groups["locale"].as_deref(), Some("de"));
        assert_eq!(groups["path"].as_deref(), Some("blog/post"));
    }

    #[test]
    fn test_literal_port_matches() {
        let pattern = UrlPattern::parse("http://localhost:3000/:locale(de)?/:path(.*)?").unwrap();
        let groups = pattern.exec(&url("http://localhost:3000/de/about")).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["locale"].as_deref(), Some("de"));
        assert_eq!(groups["path"].as_deref(), Some("about"));

        let groups = pattern.exec(&url("http://localhost:3000/about")).unwrap();
        assert_eq!(groups["locale"], None);
        assert_eq!(groups["path"].as_deref(), Some("about"));

        assert!(pattern.exec(&url("http://localhost:4000/de/about")).is_none());
    }

    #[test]
    fn test_locale_lookalike_is_path() {
        let groups = locale_pattern().exec(&url("https://example.com/design")).unwrap();
        assert_eq!(groups["locale"], None);
        assert_eq!(groups["path"].as_deref(), Some("design"));
    }

    #[test]
    fn test_literal_components_must_match() {
        let pattern = UrlPattern::parse("https://example.com/docs/:page").unwrap();
        assert!(pattern.test(&url("https://example.com/docs/intro")));
        assert!(!pattern.test(&url("http://example.com/docs/intro")));
        assert!(!pattern.test(&url("https://example.org/docs/intro")));
        assert!(!pattern.test(&url("https://example.com:8443/docs/intro")));
        assert!(!pattern.test(&url("https://example.com/docs/intro/more")));
        // search and hash are unspecified
        assert!(pattern.test(&url("https://example.com/docs/intro?x=1#top")));
    }

    #[test]
    fn test_hostname_groups() {
        let pattern = UrlPattern::parse("https://:lang.example.com/:path*").unwrap();
        let groups = pattern.exec(&url("https://fr.example.com/a/b")).unwrap();
        assert_eq!(groups["lang"].as_deref(), Some("fr"));
        assert_eq!(groups["path"].as_deref(), Some("a/b"));
        assert!(!pattern.test(&url("https://example.com/a")));
    }

    #[test]
    fn test_repeat_modifiers() {
        let plus = UrlPattern::parse("https://example.com/files/:rest+").unwrap();
        assert!(!plus.test(&url("https://example.com/files")));
        let groups = plus.exec(&url("https://example.com/files/a/b/c")).unwrap();
        assert_eq!(groups["rest"].as_deref(), Some("a/b/c"));

        let star = UrlPattern::parse("https://example.com/files/:rest*").unwrap();
        let groups = star.exec(&url("https://example.com/files")).unwrap();
        assert_eq!(groups["rest"], None);
    }

    #[test]
    fn test_later_component_overwrites_earlier() {
        // pathname is merged after hash
        let pattern = UrlPattern::parse("https://example.com/:name#:name").unwrap();
        let groups = pattern.exec(&url("https://example.com/path#hash")).unwrap();
        assert_eq!(groups["name"].as_deref(), Some("path"));
    }
}
