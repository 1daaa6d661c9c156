//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the locale echo handler
//! - Wire up middleware (locale, timeout, tracing)
//! - Bind server to listener with graceful shutdown

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::Uri,
    middleware,
    routing::{any, get},
    Extension, Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::LocalizationConfig;
use crate::error::Result;
use crate::http::middleware::{locale_middleware, RequestLocale};
use crate::locale::Locale;
use crate::runtime::LocaleRuntime;

/// Response of the echo handler.
#[derive(Debug, Serialize)]
pub struct LocaleEcho {
    /// Locale bound for this request.
    pub locale: Locale,
    pub origin: String,
    /// Path the handler saw, after de-localization.
    pub path: String,
    pub original_url: String,
    /// The same href in every configured locale.
    pub alternates: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub base_locale: Locale,
    pub locales: Vec<Locale>,
}

/// HTTP server for the locale router.
pub struct HttpServer {
    router: Router,
    config: LocalizationConfig,
}

impl HttpServer {
    pub fn new(config: LocalizationConfig, runtime: Arc<LocaleRuntime>) -> Self {
        let router = Self::build_router(&config, runtime);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &LocalizationConfig, runtime: Arc<LocaleRuntime>) -> Router {
        Router::new()
            .route("/_status", get(status_handler))
            .route("/", any(locale_echo))
            .route("/{*path}", any(locale_echo))
            .layer(middleware::from_fn_with_state(runtime.clone(), locale_middleware))
            .with_state(runtime)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> std::result::Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &LocalizationConfig {
        &self.config
    }
}

async fn locale_echo(
    State(runtime): State<Arc<LocaleRuntime>>,
    Extension(found): Extension<RequestLocale>,
    uri: Uri,
) -> Result<Json<LocaleEcho>> {
    let href = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let alternates: BTreeMap<String, String> = runtime
        .locales()
        .iter()
        .map(|locale| -> Result<(String, String)> {
            Ok((locale.to_string(), runtime.localize_href(href, Some(locale.as_str()))?))
        })
        .collect::<Result<_>>()?;

    Ok(Json(LocaleEcho {
        locale: runtime.get_locale()?,
        origin: runtime.get_url_origin(),
        path: uri.path().to_string(),
        original_url: found.original_url.to_string(),
        alternates,
    }))
}

async fn status_handler(State(runtime): State<Arc<LocaleRuntime>>) -> Json<ServerStatus> {
    Json(ServerStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        base_locale: runtime.base_locale().clone(),
        locales: runtime.locales().to_vec(),
    })
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
