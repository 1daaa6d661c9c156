//! Pattern filling.
//!
//! # Responsibilities
//! - Substitute named group values into a compiled pattern
//! - Apply removal and optionality rules per modifier
//! - Reassemble and parse the resulting URL
//!
//! # Design Decisions
//! - A removed group drops its folded `/` prefix with it, so removal never
//!   leaves an empty `//` segment behind
//! - Unspecified components are emitted empty; callers that want to keep
//!   the input's query or fragment copy them over afterwards

use std::collections::BTreeMap;

use url::Url;

use super::compiler::{Component, ComponentKind, Part, UrlPattern};
use super::tokenizer::Modifier;
use super::PatternError;

/// A value for a named group when filling a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValue {
    Value(String),
    /// Remove the segment, including its separator.
    Remove,
}

impl From<&str> for GroupValue {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for GroupValue {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

/// Values keyed by group name. A missing key means the value is undefined.
pub type FillValues = BTreeMap<String, GroupValue>;

impl UrlPattern {
    /// Build a concrete URL from this pattern and `values`.
    pub fn fill(&self, values: &FillValues) -> Result<Url, PatternError> {
        let part = |kind| fill_component(self.component(kind), values);

        let protocol = part(ComponentKind::Protocol)?;
        let username = part(ComponentKind::Username)?;
        let password = part(ComponentKind::Password)?;
        let hostname = part(ComponentKind::Hostname)?;
        let port = part(ComponentKind::Port)?;
        let pathname = part(ComponentKind::Pathname)?;
        let search = part(ComponentKind::Search)?;
        let hash = part(ComponentKind::Hash)?;

        let mut href = format!("{protocol}:");
        if self.has_authority() {
            href.push_str("//");
            if !username.is_empty() || !password.is_empty() {
                href.push_str(&username);
                if !password.is_empty() {
                    href.push(':');
                    href.push_str(&password);
                }
                href.push('@');
            }
            href.push_str(&hostname);
            if !port.is_empty() {
                href.push(':');
                href.push_str(&port);
            }
        }
        href.push_str(&pathname);
        if !search.is_empty() {
            href.push('?');
            href.push_str(&search);
        }
        if !hash.is_empty() {
            href.push('#');
            href.push_str(&hash);
        }

        Url::parse(&href).map_err(|source| PatternError::InvalidUrl { url: href, source })
    }
}

fn fill_component(component: &Component, values: &FillValues) -> Result<String, PatternError> {
    let mut out = String::new();
    for part in component.parts() {
        match part {
            Part::Literal(text) => out.push_str(text),
            Part::Group { name, modifier, prefix } => {
                let value = values.get(name);
                let emit = match (value, modifier) {
                    (Some(GroupValue::Remove), _) => None,
                    (Some(GroupValue::Value(v)), Modifier::None | Modifier::Optional) => Some(v),
                    (None, Modifier::Optional) => None,
                    (None, Modifier::None) => {
                        return Err(PatternError::MissingValue {
                            name: name.clone(),
                            repeated: false,
                        })
                    }
                    (None, Modifier::OneOrMore) => {
                        return Err(PatternError::MissingValue {
                            name: name.clone(),
                            repeated: true,
                        })
                    }
                    (None, Modifier::ZeroOrMore) => None,
                    (Some(GroupValue::Value(v)), Modifier::OneOrMore | Modifier::ZeroOrMore) => {
                        Some(v).filter(|v| !v.is_empty())
                    }
                };
                if let Some(v) = emit {
                    if let Some(p) = prefix {
                        out.push(*p);
                    }
                    out.push_str(v);
                }
            }
        }
    }
    Ok(out)
}
