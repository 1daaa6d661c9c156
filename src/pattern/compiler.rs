//! Pattern compilation.
//!
//! # Responsibilities
//! - Split the token stream into the eight URL components
//! - Fold pathname `/` separators into the group that follows them
//! - Build one anchored regex per component
//!
//! # Design Decisions
//! - Compiled once at configuration load, immutable afterwards
//! - Group captures use synthetic names (`g0`, `g1`, ...) so inline regexes
//!   may contain their own groups and any identifier is a valid group name
//! - Unspecified username, password, search and hash match anything

use regex::Regex;

use super::tokenizer::{tokenize, Modifier, Token};
use super::PatternError;

/// One of the structural parts of a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Protocol,
    Username,
    Password,
    Hostname,
    Port,
    Pathname,
    Search,
    Hash,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 8] = [
        ComponentKind::Protocol,
        ComponentKind::Username,
        ComponentKind::Password,
        ComponentKind::Hostname,
        ComponentKind::Port,
        ComponentKind::Pathname,
        ComponentKind::Search,
        ComponentKind::Hash,
    ];

    /// Merge order for matched groups. Later components overwrite earlier
    /// ones on a name collision.
    pub const AGGREGATION_ORDER: [ComponentKind; 8] = [
        ComponentKind::Hash,
        ComponentKind::Hostname,
        ComponentKind::Password,
        ComponentKind::Pathname,
        ComponentKind::Port,
        ComponentKind::Protocol,
        ComponentKind::Search,
        ComponentKind::Username,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::Username => "username",
            Self::Password => "password",
            Self::Hostname => "hostname",
            Self::Port => "port",
            Self::Pathname => "pathname",
            Self::Search => "search",
            Self::Hash => "hash",
        }
    }

    /// Regex used for a group without an inline regex.
    fn segment_wildcard(self) -> &'static str {
        match self {
            Self::Pathname => "[^/]+?",
            Self::Hostname => r"[^\.]+?",
            _ => "(?s:.+?)",
        }
    }

    /// Separator folded into a following group.
    fn prefix(self) -> Option<char> {
        match self {
            Self::Pathname => Some('/'),
            _ => None,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled piece of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Literal(String),
    Group {
        name: String,
        modifier: Modifier,
        prefix: Option<char>,
    },
}

/// A compiled URL component.
#[derive(Debug, Clone)]
pub struct Component {
    kind: ComponentKind,
    parts: Vec<Part>,
    /// `None` when the pattern leaves the component unspecified.
    regex: Option<Regex>,
    group_names: Vec<String>,
}

impl Component {
    fn any(kind: ComponentKind) -> Self {
        Self {
            kind,
            parts: Vec::new(),
            regex: None,
            group_names: Vec::new(),
        }
    }

    fn compile(kind: ComponentKind, tokens: &[Token]) -> Result<Self, PatternError> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut pending_prefix = None;
        let mut source = String::from("^");
        let mut group_names: Vec<String> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::Char { value, escaped } => {
                    let folds = !escaped
                        && kind.prefix() == Some(*value)
                        && matches!(tokens.get(i + 1), Some(Token::Group(_)));
                    if folds {
                        pending_prefix = Some(*value);
                    } else {
                        literal.push(*value);
                    }
                }
                Token::Group(group) => {
                    if group_names.contains(&group.name) {
                        return Err(PatternError::DuplicateGroup {
                            component: kind,
                            name: group.name.clone(),
                        });
                    }
                    if !literal.is_empty() {
                        source.push_str(&regex::escape(&literal));
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }

                    let prefix = pending_prefix.take();
                    let body = group.regex.as_deref().unwrap_or(kind.segment_wildcard());
                    source.push_str(&group_regex(group_names.len(), body, group.modifier, prefix));

                    group_names.push(group.name.clone());
                    parts.push(Part::Group {
                        name: group.name.clone(),
                        modifier: group.modifier,
                        prefix,
                    });
                }
            }
        }
        if !literal.is_empty() {
            source.push_str(&regex::escape(&literal));
            parts.push(Part::Literal(literal));
        }
        source.push('$');

        let regex = Regex::new(&source).map_err(|e| PatternError::InvalidRegex {
            component: kind,
            message: e.to_string(),
        })?;

        Ok(Self {
            kind,
            parts,
            regex: Some(regex),
            group_names,
        })
    }

    fn literal(kind: ComponentKind, text: &str) -> Result<Self, PatternError> {
        let tokens: Vec<Token> = text
            .chars()
            .map(|value| Token::Char { value, escaped: true })
            .collect();
        Self::compile(kind, &tokens)
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// True when the pattern leaves this component unspecified.
    pub fn is_wildcard(&self) -> bool {
        self.regex.is_none()
    }

    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    /// Match `input` and return the component's groups in declaration order.
    pub(crate) fn captures(&self, input: &str) -> Option<Vec<(String, Option<String>)>> {
        let Some(regex) = &self.regex else {
            return Some(Vec::new());
        };
        let caps = regex.captures(input)?;
        Some(
            self.group_names
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let value = caps.name(&format!("g{idx}")).map(|m| m.as_str().to_string());
                    (name.clone(), value)
                })
                .collect(),
        )
    }
}

fn group_regex(idx: usize, body: &str, modifier: Modifier, prefix: Option<char>) -> String {
    let name = format!("g{idx}");
    match prefix {
        None => match modifier {
            Modifier::None => format!("(?P<{name}>{body})"),
            Modifier::Optional => format!("(?P<{name}>{body})?"),
            Modifier::OneOrMore => format!("(?P<{name}>(?:{body})+)"),
            Modifier::ZeroOrMore => format!("(?P<{name}>(?:{body})*)"),
        },
        Some(p) => {
            let p = regex::escape(&p.to_string());
            match modifier {
                Modifier::None => format!("(?:{p}(?P<{name}>{body}))"),
                Modifier::Optional => format!("(?:{p}(?P<{name}>{body}))?"),
                Modifier::OneOrMore => format!("(?:{p}(?P<{name}>(?:{body})(?:{p}(?:{body}))*))"),
                Modifier::ZeroOrMore => format!("(?:{p}(?P<{name}>(?:{body})(?:{p}(?:{body}))*))?"),
            }
        }
    }
}

/// A compiled URL pattern.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    source: String,
    has_authority: bool,
    components: Vec<Component>,
}

impl UrlPattern {
    /// Parse and compile a pattern string such as
    /// `:protocol://:domain(.*)::port?/:locale(de)?/:path(.*)?`.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let tokens = tokenize(source)?;
        let sections = Sections::split(&tokens)?;

        let pathname = if sections.pathname.is_empty() && sections.authority {
            Component::literal(ComponentKind::Pathname, "/")?
        } else {
            Component::compile(ComponentKind::Pathname, sections.pathname)?
        };
        let optional = |kind, tokens: Option<&[Token]>| match tokens {
            Some(tokens) => Component::compile(kind, tokens),
            None => Ok(Component::any(kind)),
        };

        let components = vec![
            Component::compile(ComponentKind::Protocol, sections.protocol)?,
            optional(ComponentKind::Username, sections.username)?,
            optional(ComponentKind::Password, sections.password)?,
            Component::compile(ComponentKind::Hostname, sections.hostname)?,
            Component::compile(ComponentKind::Port, sections.port)?,
            pathname,
            optional(ComponentKind::Search, sections.search)?,
            optional(ComponentKind::Hash, sections.hash)?,
        ];

        Ok(Self {
            source: source.to_string(),
            has_authority: sections.authority,
            components,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn has_authority(&self) -> bool {
        self.has_authority
    }

    pub fn component(&self, kind: ComponentKind) -> &Component {
        &self.components[kind as usize]
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// True if any component declares a group called `name`.
    pub fn has_group(&self, name: &str) -> bool {
        self.components
            .iter()
            .any(|c| c.group_names.iter().any(|n| n == name))
    }
}

impl std::fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Token slices for each component of a constructor string.
struct Sections<'a> {
    protocol: &'a [Token],
    authority: bool,
    username: Option<&'a [Token]>,
    password: Option<&'a [Token]>,
    hostname: &'a [Token],
    port: &'a [Token],
    pathname: &'a [Token],
    search: Option<&'a [Token]>,
    hash: Option<&'a [Token]>,
}

impl<'a> Sections<'a> {
    fn split(tokens: &'a [Token]) -> Result<Self, PatternError> {
        let colon = tokens
            .iter()
            .position(|t| t.is_delimiter(':') || t.is_delimiter('/') || t.is_delimiter('?') || t.is_delimiter('#'))
            .filter(|&i| i > 0 && tokens[i].is_delimiter(':'))
            .ok_or(PatternError::Relative)?;
        let protocol = &tokens[..colon];
        let rest = &tokens[colon + 1..];

        let mut sections = Sections {
            protocol,
            authority: false,
            username: None,
            password: None,
            hostname: &[],
            port: &[],
            pathname: &[],
            search: None,
            hash: None,
        };

        let rest = if rest.len() >= 2 && rest[0].is_delimiter('/') && rest[1].is_delimiter('/') {
            let body = &rest[2..];
            let end = body
                .iter()
                .position(|t| t.is_delimiter('/') || t.is_delimiter('?') || t.is_delimiter('#'))
                .unwrap_or(body.len());
            sections.authority = true;
            sections.split_authority(&body[..end]);
            &body[end..]
        } else {
            rest
        };

        let hash_at = rest.iter().position(|t| t.is_delimiter('#'));
        let before_hash = &rest[..hash_at.unwrap_or(rest.len())];
        let search_at = before_hash.iter().position(|t| t.is_delimiter('?'));

        sections.pathname = &before_hash[..search_at.unwrap_or(before_hash.len())];
        sections.search = search_at.map(|i| &before_hash[i + 1..]);
        sections.hash = hash_at.map(|i| &rest[i + 1..]);
        Ok(sections)
    }

    fn split_authority(&mut self, authority: &'a [Token]) {
        let host = match authority.iter().rposition(|t| t.is_delimiter('@')) {
            Some(at) => {
                let credentials = &authority[..at];
                match credentials.iter().position(|t| t.is_delimiter(':')) {
                    Some(colon) => {
                        self.username = Some(&credentials[..colon]);
                        self.password = Some(&credentials[colon + 1..]);
                    }
                    None => self.username = Some(credentials),
                }
                &authority[at + 1..]
            }
            None => authority,
        };

        // The port separator is the last colon outside an IPv6 literal.
        let mut depth = 0i32;
        let mut port_at = None;
        for (i, token) in host.iter().enumerate() {
            if token.is_delimiter('[') {
                depth += 1;
            } else if token.is_delimiter(']') {
                depth -= 1;
            } else if depth == 0 && token.is_delimiter(':') {
                port_at = Some(i);
            }
        }

        match port_at {
            Some(i) => {
                self.hostname = &host[..i];
                self.port = &host[i + 1..];
            }
            None => self.hostname = host,
        }
    }
}
