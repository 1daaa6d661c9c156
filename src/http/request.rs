//! Request URL reconstruction.
//!
//! # Responsibilities
//! - Build the absolute URL of an inbound request
//!
//! # Design Decisions
//! - An absolute-form request target is used as is
//! - Otherwise the authority comes from `Host` and the scheme from the
//!   first `x-forwarded-proto` value, defaulting to `http`

use axum::http::{header, HeaderMap, Request};
use url::Url;

use crate::error::{LocaleError, Result};

pub const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// The absolute URL of `request`.
pub fn request_url<B>(request: &Request<B>) -> Result<Url> {
    let uri = request.uri();
    if uri.scheme().is_some() && uri.authority().is_some() {
        let input = uri.to_string();
        return Url::parse(&input).map_err(|source| LocaleError::InvalidUrl { input, source });
    }

    let host = header_str(request.headers(), header::HOST.as_str())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .ok_or_else(|| LocaleError::InvalidUrl {
            input: uri.to_string(),
            source: url::ParseError::EmptyHost,
        })?;
    let scheme = header_str(request.headers(), X_FORWARDED_PROTO)
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let input = format!("{scheme}://{host}{path}");
    Url::parse(&input).map_err(|source| LocaleError::InvalidUrl { input, source })
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
