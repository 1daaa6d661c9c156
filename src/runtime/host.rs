//! Host capabilities the strategies depend on.
//!
//! # Responsibilities
//! - Abstract the browsing context (current URL, navigation, reload)
//! - Abstract the cookie store
//! - Provide in-memory implementations for tests and the CLI
//!
//! # Design Decisions
//! - A strategy whose capability is not installed abstains on read and is
//!   skipped on write
//! - Implementations must be `Send + Sync`; the runtime is shared via Arc

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use url::Url;

use crate::locale::cookie::locale_cookie;

/// A client-side browsing context.
pub trait BrowsingContext: Send + Sync {
    /// The URL currently displayed.
    fn current_url(&self) -> Url;

    /// Navigate to `url`. Navigation ends the current `set_locale` call.
    fn navigate(&self, url: Url);

    /// Reload the current page so observers pick up new locale state.
    fn reload(&self);
}

/// A cookie store in `document.cookie` style.
pub trait CookieStore: Send + Sync {
    /// All cookies as `name=value` pairs joined by `; `, if any.
    fn cookies(&self) -> Option<String>;

    fn set_cookie(&self, name: &str, value: &str);
}

/// An in-memory cookie jar.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    jar: RwLock<BTreeMap<String, String>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the jar from a `Cookie` header style string.
    pub fn from_header(header: &str) -> Self {
        let jar = header
            .split(';')
            .filter_map(|pair| {
                let (k, v) = pair.trim().split_once('=')?;
                Some((k.to_string(), v.to_string()))
            })
            .collect();
        Self { jar: RwLock::new(jar) }
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.jar
            .read()
            .expect("cookie jar lock poisoned")
            .get(name)
            .cloned()
    }
}

impl CookieStore for MemoryCookieStore {
    fn cookies(&self) -> Option<String> {
        let jar = self.jar.read().expect("cookie jar lock poisoned");
        if jar.is_empty() {
            return None;
        }
        Some(
            jar.iter()
                .map(|(k, v)| locale_cookie(k, v))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn set_cookie(&self, name: &str, value: &str) {
        self.jar
            .write()
            .expect("cookie jar lock poisoned")
            .insert(name.to_string(), value.to_string());
    }
}

/// A browsing context that records navigations and reloads instead of
/// performing them.
#[derive(Debug)]
pub struct SimulatedBrowser {
    location: RwLock<Url>,
    navigations: AtomicUsize,
    reloads: AtomicUsize,
}

impl SimulatedBrowser {
    pub fn new(location: Url) -> Self {
        Self {
            location: RwLock::new(location),
            navigations: AtomicUsize::new(0),
            reloads: AtomicUsize::new(0),
        }
    }

    pub fn location(&self) -> Url {
        self.location.read().expect("location lock poisoned").clone()
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::Relaxed)
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::Relaxed)
    }
}

impl BrowsingContext for SimulatedBrowser {
    fn current_url(&self) -> Url {
        self.location()
    }

    fn navigate(&self, url: Url) {
        tracing::debug!(to = %url, "Navigating");
        *self.location.write().expect("location lock poisoned") = url;
        self.navigations.fetch_add(1, Ordering::Relaxed);
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
    }
}
