//! Shared fixtures for integration tests.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use url::Url;

use locale_router::config::{GroupOverride, LocalizationConfig, UrlPatternConfig};
use locale_router::{HttpServer, LocaleRuntime, Strategy};

/// `en` (base) and `de`, with the given strategy chain and default patterns.
#[allow(dead_code)]
pub fn config(strategy: Vec<Strategy>) -> LocalizationConfig {
    LocalizationConfig {
        base_locale: "en".into(),
        locales: vec!["en".into(), "de".into()],
        strategy,
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn runtime(config: &LocalizationConfig) -> Arc<LocaleRuntime> {
    LocaleRuntime::from_config(config).unwrap()
}

#[allow(dead_code)]
pub fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

#[allow(dead_code)]
pub fn group(value: &str) -> GroupOverride {
    GroupOverride::Value(value.to_string())
}

/// A pattern entry from `(group, override)` lists.
#[allow(dead_code)]
pub fn pattern(
    source: &str,
    de_localized: Vec<(&str, GroupOverride)>,
    localized: Vec<(&str, Vec<(&str, GroupOverride)>)>,
) -> UrlPatternConfig {
    let to_map = |groups: Vec<(&str, GroupOverride)>| -> BTreeMap<String, GroupOverride> {
        groups.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    };
    UrlPatternConfig {
        pattern: source.to_string(),
        de_localized_named_groups: to_map(de_localized),
        localized_named_groups: localized
            .into_iter()
            .map(|(locale, groups)| (locale.to_string(), to_map(groups)))
            .collect(),
    }
}

/// Start the locale router on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(config: LocalizationConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let runtime = runtime(&config);

    tokio::spawn(async move {
        let _ = HttpServer::new(config, runtime).run(listener).await;
    });
    addr
}
