//! Locale cookie wire format: a single `name=locale` pair.

/// Find the value of cookie `name` in a `Cookie` header or a
/// document-style cookie string (`a=1; b=2`).
pub fn find_cookie<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Serialize the locale cookie.
pub fn locale_cookie(name: &str, locale: &str) -> String {
    format!("{name}={locale}")
}
