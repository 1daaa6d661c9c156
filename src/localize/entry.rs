//! Compiled pattern entries.

use crate::config::{GroupOverride, UrlPatternConfig};
use crate::locale::{Locale, LocaleRegistry};
use crate::pattern::{FillValues, GroupValue, NamedGroups, PatternError, UrlPattern};

/// Overrides for named groups, keyed by group name.
pub type GroupOverrides = std::collections::BTreeMap<String, GroupOverride>;

/// A URL pattern with its canonical and per-locale override rules.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pattern: UrlPattern,
    de_localized: GroupOverrides,
    /// In configured locale order. Locales without overrides are absent.
    localized: Vec<(Locale, GroupOverrides)>,
}

impl PatternEntry {
    /// Compile a configured entry. Override keys naming unknown locales are
    /// rejected by validation and skipped here.
    pub fn compile(config: &UrlPatternConfig, registry: &LocaleRegistry) -> Result<Self, PatternError> {
        let pattern = UrlPattern::parse(&config.pattern)?;
        let localized = registry
            .locales()
            .iter()
            .filter_map(|locale| {
                config
                    .localized_named_groups
                    .get(locale.as_str())
                    .map(|groups| (locale.clone(), groups.clone()))
            })
            .collect();

        Ok(Self {
            pattern,
            de_localized: config.de_localized_named_groups.clone(),
            localized,
        })
    }

    pub fn pattern(&self) -> &UrlPattern {
        &self.pattern
    }

    pub fn de_localized(&self) -> &GroupOverrides {
        &self.de_localized
    }

    pub fn localized(&self) -> &[(Locale, GroupOverrides)] {
        &self.localized
    }

    /// Overrides for `locale`, if any are configured.
    pub fn overrides_for(&self, locale: &Locale) -> Option<&GroupOverrides> {
        self.localized
            .iter()
            .find(|(l, _)| l == locale)
            .map(|(_, groups)| groups)
    }
}

impl GroupOverride {
    fn to_group_value(&self) -> GroupValue {
        match self {
            GroupOverride::Value(v) => GroupValue::Value(v.clone()),
            GroupOverride::Segments(segments) => GroupValue::Value(segments.join("/")),
            GroupOverride::Remove => GroupValue::Remove,
        }
    }

    /// True if a matched group satisfies this override.
    pub(crate) fn agrees_with(&self, matched: Option<&str>) -> bool {
        match self {
            GroupOverride::Remove => matched.is_none(),
            GroupOverride::Value(v) => matched == Some(v.as_str()),
            GroupOverride::Segments(segments) => {
                let found: Vec<&str> = matched.map(|m| m.split('/').collect()).unwrap_or_default();
                found == *segments
            }
        }
    }
}

/// Merge overrides over matched groups. Overrides win; groups that did not
/// participate stay undefined.
pub(crate) fn merge_groups(groups: NamedGroups, overrides: Option<&GroupOverrides>) -> FillValues {
    let mut values: FillValues = groups
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, GroupValue::Value(v))))
        .collect();
    for (name, value) in overrides.into_iter().flatten() {
        values.insert(name.clone(), value.to_group_value());
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agrees_with() {
        assert!(GroupOverride::Remove.agrees_with(None));
        assert!(!GroupOverride::Remove.agrees_with(Some("de")));
        assert!(GroupOverride::Value("de".into()).agrees_with(Some("de")));
        assert!(!GroupOverride::Value("de".into()).agrees_with(None));

        let segments = GroupOverride::Segments(vec!["a".into(), "b".into()]);
        assert!(segments.agrees_with(Some("a/b")));
        assert!(!segments.agrees_with(Some("a")));
        assert!(GroupOverride::Segments(Vec::new()).agrees_with(None));
    }

    #[test]
    fn test_merge_overrides_win() {
        let groups = NamedGroups::from([
            ("locale".to_string(), Some("de".to_string())),
            ("path".to_string(), Some("about".to_string())),
            ("port".to_string(), None),
        ]);
        let overrides = GroupOverrides::from([
            ("locale".to_string(), GroupOverride::Remove),
            ("section".to_string(), GroupOverride::Segments(vec!["a".into(), "b".into()])),
        ]);

        let values = merge_groups(groups, Some(&overrides));
        assert_eq!(values["locale"], GroupValue::Remove);
        assert_eq!(values["path"], GroupValue::from("about"));
        assert_eq!(values["section"], GroupValue::from("a/b"));
        assert!(!values.contains_key("port"));
    }
}
