//! Locale runtime.
//!
//! # Responsibilities
//! - Own the compiled configuration (registry, strategy chain, patterns)
//! - Own the process-wide fallback slot and the observer channel
//! - Hold the optional host capabilities and override hooks
//!
//! # Data Flow
//! ```text
//! LocalizationConfig
//!     → LocaleRuntime::builder (validate, compile patterns)
//!     → with_* (host capabilities, override hooks)
//!     → build() → Arc<LocaleRuntime>
//!     → resolve.rs (get/set locale, origin, request extraction)
//!     → localize (URL and href rewriting)
//! ```
//!
//! # Design Decisions
//! - Immutable after `build()`; the slot and observers are the only
//!   mutable state
//! - Override hooks replace the whole operation they stand in for

pub mod context;
pub mod host;
mod resolve;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use url::Url;

use crate::config::validation::validate_config;
use crate::config::{ConfigError, LocalizationConfig};
use crate::error::{LocaleError, Result};
use crate::locale::{Locale, LocaleRegistry, LocaleSlot, Strategy};
use crate::localize::UrlLocalizer;

pub use context::RequestContext;
pub use host::{BrowsingContext, CookieStore, MemoryCookieStore, SimulatedBrowser};

/// Origin reported when neither a request context nor a browsing context
/// is available.
pub const FALLBACK_ORIGIN: &str = "http://fallback.com";

/// Replaces `get_locale`. The returned value is still checked against the
/// configured locales.
pub trait LocaleProvider: Send + Sync {
    fn provide_locale(&self) -> String;
}

impl<F> LocaleProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn provide_locale(&self) -> String {
        self()
    }
}

/// Replaces the storage half of `set_locale`.
pub trait LocaleSetter: Send + Sync {
    fn store_locale(&self, locale: &Locale);
}

impl<F> LocaleSetter for F
where
    F: Fn(&Locale) + Send + Sync,
{
    fn store_locale(&self, locale: &Locale) {
        self(locale)
    }
}

/// Replaces `get_url_origin`.
pub trait OriginProvider: Send + Sync {
    fn origin(&self) -> String;
}

impl<F> OriginProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn origin(&self) -> String {
        self()
    }
}

/// What `set_locale` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetLocaleOutcome {
    /// The `url` strategy navigated to the localized URL.
    Navigated(Url),
    /// The locale was stored and the browsing context was reloaded.
    Reloaded,
    /// The locale was stored; there was nothing to reload.
    Stored,
}

#[derive(Default)]
struct Overrides {
    locale: Option<Arc<dyn LocaleProvider>>,
    setter: Option<Arc<dyn LocaleSetter>>,
    origin: Option<Arc<dyn OriginProvider>>,
}

/// Locale resolution and URL localization for one configuration.
pub struct LocaleRuntime {
    registry: LocaleRegistry,
    cookie_name: String,
    strategy: Vec<Strategy>,
    localizer: UrlLocalizer,
    slot: LocaleSlot,
    observers: watch::Sender<Option<Locale>>,
    browsing: Option<Arc<dyn BrowsingContext>>,
    cookies: Option<Arc<dyn CookieStore>>,
    overrides: Overrides,
}

impl fmt::Debug for LocaleRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleRuntime")
            .field("registry", &self.registry)
            .field("cookie_name", &self.cookie_name)
            .field("strategy", &self.strategy)
            .field("patterns", &self.localizer.entries().len())
            .field("browsing", &self.browsing.is_some())
            .field("cookies", &self.cookies.is_some())
            .finish_non_exhaustive()
    }
}

impl LocaleRuntime {
    /// Validate `config` and start building a runtime from it.
    pub fn builder(config: &LocalizationConfig) -> Result<LocaleRuntimeBuilder, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let registry = LocaleRegistry::new(&config.base_locale, &config.locales)?;
        let localizer =
            UrlLocalizer::compile(&config.effective_url_patterns(), &registry).map_err(LocaleError::from)?;

        Ok(LocaleRuntimeBuilder {
            registry,
            cookie_name: config.cookie_name.clone(),
            strategy: config.strategy.clone(),
            localizer,
            browsing: None,
            cookies: None,
            overrides: Overrides::default(),
        })
    }

    /// A runtime with no host capabilities and no overrides.
    pub fn from_config(config: &LocalizationConfig) -> Result<Arc<Self>, ConfigError> {
        Ok(Self::builder(config)?.build())
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    pub fn base_locale(&self) -> &Locale {
        self.registry.base_locale()
    }

    pub fn locales(&self) -> &[Locale] {
        self.registry.locales()
    }

    pub fn is_locale(&self, value: &str) -> bool {
        self.registry.is_locale(value)
    }

    pub fn assert_is_locale(&self, value: &str) -> Result<Locale> {
        self.registry.assert_is_locale(value)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn strategy(&self) -> &[Strategy] {
        &self.strategy
    }

    pub fn uses_strategy(&self, strategy: Strategy) -> bool {
        self.strategy.contains(&strategy)
    }

    pub fn localizer(&self) -> &UrlLocalizer {
        &self.localizer
    }

    /// The process-wide fallback slot read by `globalVariable`.
    pub fn slot(&self) -> &LocaleSlot {
        &self.slot
    }

    pub fn localize_url(&self, url: &Url, locale: &Locale) -> Result<Url> {
        self.localizer.localize(url, locale)
    }

    pub fn de_localize_url(&self, url: &Url) -> Result<Url> {
        self.localizer.de_localize(url)
    }

    pub fn extract_locale_from_url(&self, url: &Url) -> Option<Locale> {
        self.localizer.extract_locale(url)
    }

    /// Parse `input` as an absolute URL.
    pub fn parse_url(input: &str) -> Result<Url> {
        Url::parse(input).map_err(|source| LocaleError::InvalidUrl {
            input: input.to_string(),
            source,
        })
    }
}

/// Builder returned by [`LocaleRuntime::builder`].
pub struct LocaleRuntimeBuilder {
    registry: LocaleRegistry,
    cookie_name: String,
    strategy: Vec<Strategy>,
    localizer: UrlLocalizer,
    browsing: Option<Arc<dyn BrowsingContext>>,
    cookies: Option<Arc<dyn CookieStore>>,
    overrides: Overrides,
}

impl LocaleRuntimeBuilder {
    pub fn with_browsing_context(mut self, browsing: Arc<dyn BrowsingContext>) -> Self {
        self.browsing = Some(browsing);
        self
    }

    pub fn with_cookie_store(mut self, cookies: Arc<dyn CookieStore>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    pub fn with_locale_provider(mut self, provider: impl LocaleProvider + 'static) -> Self {
        self.overrides.locale = Some(Arc::new(provider));
        self
    }

    pub fn with_locale_setter(mut self, setter: impl LocaleSetter + 'static) -> Self {
        self.overrides.setter = Some(Arc::new(setter));
        self
    }

    pub fn with_origin_provider(mut self, provider: impl OriginProvider + 'static) -> Self {
        self.overrides.origin = Some(Arc::new(provider));
        self
    }

    pub fn build(self) -> Arc<LocaleRuntime> {
        let (observers, _) = watch::channel(None);
        tracing::debug!(
            base_locale = %self.registry.base_locale(),
            locales = self.registry.locales().len(),
            patterns = self.localizer.entries().len(),
            strategy = %crate::locale::strategy::describe_chain(&self.strategy),
            "Locale runtime built"
        );

        Arc::new(LocaleRuntime {
            registry: self.registry,
            cookie_name: self.cookie_name,
            strategy: self.strategy,
            localizer: self.localizer,
            slot: LocaleSlot::new(),
            observers,
            browsing: self.browsing,
            cookies: self.cookies,
            overrides: self.overrides,
        })
    }
}
