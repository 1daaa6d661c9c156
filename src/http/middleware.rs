//! Locale middleware.
//!
//! # Responsibilities
//! - Extract the request locale through the strategy chain
//! - Rewrite the request to its canonical URL when the `url` strategy is
//!   in use, so handlers route on locale-independent paths
//! - Bind a [`RequestContext`] for the rest of the request
//! - Tag the response with `Content-Language`
//!
//! # Design Decisions
//! - The context is bound with a task-local scope around `next.run`, so
//!   concurrent requests never observe each other's locale
//! - Failures short-circuit with the status from [`LocaleError::status_code`](crate::error::LocaleError::status_code)

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use url::{Position, Url};

use crate::error::Result;
use crate::http::request::request_url;
use crate::locale::{Locale, Strategy};
use crate::runtime::{LocaleRuntime, RequestContext};

/// Locale information attached to each request that passed the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale {
    pub locale: Locale,
    pub origin: String,
    /// The URL as the client sent it, before de-localization.
    pub original_url: Url,
}

/// Axum middleware; install with `axum::middleware::from_fn_with_state`.
pub async fn locale_middleware(
    State(runtime): State<Arc<LocaleRuntime>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let request_locale = match prepare(&runtime, &mut request) {
        Ok(found) => found,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(
        locale = %request_locale.locale,
        path = %request.uri().path(),
        "Request locale resolved"
    );

    let locale = request_locale.locale.clone();
    let context = RequestContext::new(locale.clone(), request_locale.origin.clone());
    request.extensions_mut().insert(request_locale);

    let mut response = context.scope(next.run(request)).await;
    if let Ok(value) = HeaderValue::from_str(locale.as_str()) {
        response.headers_mut().insert(header::CONTENT_LANGUAGE, value);
    }
    response
}

fn prepare(runtime: &LocaleRuntime, request: &mut Request<Body>) -> Result<RequestLocale> {
    let locale = runtime.extract_locale_from_request(request)?;
    let original_url = request_url(request)?;
    let origin = original_url.origin().ascii_serialization();

    if runtime.uses_strategy(Strategy::Url) {
        let canonical = runtime.de_localize_url(&original_url)?;
        if canonical != original_url {
            rewrite_target(request, &canonical);
        }
    }

    Ok(RequestLocale {
        locale,
        origin,
        original_url,
    })
}

/// Point `request` at `canonical`, keeping the request-target form.
fn rewrite_target(request: &mut Request<Body>, canonical: &Url) {
    let absolute = request.uri().scheme().is_some();
    let target = if absolute {
        &canonical[..Position::AfterQuery]
    } else {
        &canonical[Position::BeforePath..Position::AfterQuery]
    };

    match target.parse::<Uri>() {
        Ok(uri) => {
            tracing::trace!(from = %request.uri(), to = %uri, "De-localized request target");
            *request.uri_mut() = uri;
        }
        Err(e) => {
            tracing::warn!(request_target = target, error = %e, "Canonical URL is not a valid request target");
            return;
        }
    }

    if !absolute {
        let authority = &canonical[Position::BeforeHost..Position::AfterPort];
        if let Ok(host) = HeaderValue::from_str(authority) {
            request.headers_mut().insert(header::HOST, host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocalizationConfig;
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app(strategy: Vec<Strategy>) -> Router {
        let config = LocalizationConfig {
            locales: vec!["en".into(), "de".into()],
            strategy,
            ..Default::default()
        };
        let runtime = LocaleRuntime::from_config(&config).unwrap();
        Router::new()
            .route(
                "/{*path}",
                get(|uri: Uri, Extension(found): Extension<RequestLocale>| async move {
                    format!("{} {}", found.locale, uri.path())
                }),
            )
            .layer(middleware::from_fn_with_state(runtime.clone(), locale_middleware))
            .with_state(runtime)
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_url_strategy_rewrites_path() {
        let request = Request::builder()
            .uri("/de/about")
            .header(header::HOST, "example.com")
            .body(Body::empty())
            .unwrap();
        let response = app(vec![Strategy::Url, Strategy::BaseLocale]).oneshot(request).await.unwrap();

        assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "de");
        assert_eq!(body(response).await, "de /about");
    }

    #[tokio::test]
    async fn test_cookie_strategy_keeps_path() {
        let request = Request::builder()
            .uri("/de/about")
            .header(header::HOST, "example.com")
            .header(header::COOKIE, "LOCALE=en")
            .body(Body::empty())
            .unwrap();
        let response = app(vec![Strategy::Cookie, Strategy::BaseLocale]).oneshot(request).await.unwrap();

        assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "en");
        assert_eq!(body(response).await, "en /de/about");
    }

    #[tokio::test]
    async fn test_invalid_cookie_is_bad_request() {
        let request = Request::builder()
            .uri("/about")
            .header(header::HOST, "example.com")
            .header(header::COOKIE, "LOCALE=xx")
            .body(Body::empty())
            .unwrap();
        let response = app(vec![Strategy::Cookie, Strategy::BaseLocale]).oneshot(request).await.unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
