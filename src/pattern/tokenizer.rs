//! Pattern tokenizer.
//!
//! # Responsibilities
//! - Split a pattern string into literal characters and named groups
//! - Read inline regex bodies with balanced parentheses
//! - Reject syntax outside the supported modifier set
//!
//! # Design Decisions
//! - Escaped characters (`\:`) are kept as literals and never act as
//!   structural delimiters
//! - `?` after a group is a modifier; a bare `?` is a literal the compiler
//!   treats as the search delimiter

use super::PatternError;

/// Group modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    None,
    /// `?`
    Optional,
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
}

impl Modifier {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(Self::Optional),
            '+' => Some(Self::OneOrMore),
            '*' => Some(Self::ZeroOrMore),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Optional => "?",
            Self::OneOrMore => "+",
            Self::ZeroOrMore => "*",
        }
    }
}

/// A named group such as `:locale(de)?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedGroup {
    pub name: String,
    /// Inline regex body, without the surrounding parentheses.
    pub regex: Option<String>,
    pub modifier: Modifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A literal character. `escaped` marks characters written as `\x`.
    Char { value: char, escaped: bool },
    Group(NamedGroup),
}

impl Token {
    /// True for an unescaped literal equal to `c`.
    pub fn is_delimiter(&self, c: char) -> bool {
        matches!(self, Token::Char { value, escaped: false } if *value == c)
    }
}

/// Group names start with a letter or `_`, so `:8080` stays a port.
fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize a pattern string.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, value) = chars.next().ok_or(PatternError::TrailingEscape { pos })?;
                tokens.push(Token::Char { value, escaped: true });
            }
            ':' if chars.peek().is_some_and(|&(_, n)| is_name_start(n)) => {
                let mut name = String::new();
                while let Some(&(_, n)) = chars.peek() {
                    if !is_name_char(n) {
                        break;
                    }
                    name.push(n);
                    chars.next();
                }

                let regex = if chars.peek().is_some_and(|&(_, n)| n == '(') {
                    chars.next();
                    Some(read_regex(&mut chars, pos)?)
                } else {
                    None
                };

                let modifier = match chars.peek().and_then(|&(_, m)| Modifier::from_char(m)) {
                    Some(m) => {
                        chars.next();
                        m
                    }
                    None => Modifier::None,
                };

                tokens.push(Token::Group(NamedGroup { name, regex, modifier }));
            }
            '(' => return Err(PatternError::AnonymousGroup { pos }),
            '*' => return Err(PatternError::Unsupported { pos, found: '*' }),
            '{' | '}' => return Err(PatternError::Unsupported { pos, found: c }),
            _ => tokens.push(Token::Char { value: c, escaped: false }),
        }
    }

    Ok(tokens)
}

/// Read a regex body after the opening parenthesis, up to its matching `)`.
fn read_regex<I>(chars: &mut std::iter::Peekable<I>, start: usize) -> Result<String, PatternError>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut body = String::new();
    let mut depth = 1usize;
    let mut in_class = false;

    while let Some((_, c)) = chars.next() {
        match c {
            '\\' => {
                body.push(c);
                if let Some((_, escaped)) = chars.next() {
                    body.push(escaped);
                }
                continue;
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => {
                depth -= 1;
                if depth == 0 {
                    if body.is_empty() {
                        return Err(PatternError::EmptyRegex { pos: start });
                    }
                    return Ok(body);
                }
            }
            _ => {}
        }
        body.push(c);
    }

    Err(PatternError::UnterminatedRegex { pos: start })
}
