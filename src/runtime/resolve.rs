//! Strategy resolution.
//!
//! # Responsibilities
//! - Read the active locale through the strategy chain
//! - Write a new locale through the strategy chain
//! - Resolve the current origin
//! - Extract a locale from an inbound HTTP request
//!
//! # Design Decisions
//! - The first strategy that yields a value wins; an invalid value is a
//!   hard error, never skipped
//! - Reading abstains for strategies whose host capability is missing;
//!   writing skips them

use axum::http::{header, Request};
use tokio::sync::watch;
use url::Url;

use super::{LocaleRuntime, RequestContext, SetLocaleOutcome, FALLBACK_ORIGIN};
use crate::error::{LocaleError, Result};
use crate::locale::cookie::find_cookie;
use crate::locale::strategy::describe_chain;
use crate::locale::{Locale, Strategy};
use crate::observability::metrics;

impl LocaleRuntime {
    /// The active locale.
    ///
    /// An installed [`LocaleProvider`](super::LocaleProvider) decides alone.
    /// Otherwise a bound [`RequestContext`] wins, and after that the
    /// strategy chain is walked in order.
    pub fn get_locale(&self) -> Result<Locale> {
        if let Some(provider) = &self.overrides.locale {
            let locale = self.checked(&provider.provide_locale())?;
            metrics::record_resolution("override");
            return Ok(locale);
        }

        if let Some(ctx) = RequestContext::current() {
            metrics::record_resolution("requestContext");
            return Ok(ctx.locale);
        }

        for &strategy in &self.strategy {
            if let Some(raw) = self.read_strategy(strategy) {
                let locale = self.checked(&raw)?;
                metrics::record_resolution(strategy.as_str());
                tracing::trace!(%strategy, locale = %locale, "Resolved locale");
                return Ok(locale);
            }
        }

        Err(self.no_locale_found())
    }

    fn read_strategy(&self, strategy: Strategy) -> Option<String> {
        match strategy {
            Strategy::Url => {
                let browsing = self.browsing.as_ref()?;
                self.extract_locale_from_url(&browsing.current_url())
                    .map(|l| l.as_str().to_string())
            }
            Strategy::Cookie => self.extract_locale_from_cookie().map(|l| l.as_str().to_string()),
            Strategy::GlobalVariable => self.slot.get().map(|l| l.as_str().to_string()),
            Strategy::BaseLocale => Some(self.base_locale().as_str().to_string()),
        }
    }

    /// Store `value` as the active locale.
    ///
    /// Under the `url` strategy with a browsing context this navigates to
    /// the localized current URL and returns at once. Otherwise every
    /// writable strategy stores the locale, observers are notified, and the
    /// browsing context (if any) is reloaded.
    pub fn set_locale(&self, value: &str) -> Result<SetLocaleOutcome> {
        let locale = self.checked(value)?;

        if let Some(setter) = &self.overrides.setter {
            setter.store_locale(&locale);
            return Ok(SetLocaleOutcome::Stored);
        }

        let mut stored = false;
        for &strategy in &self.strategy {
            match strategy {
                Strategy::GlobalVariable => {
                    self.slot.set(locale.clone());
                    stored = true;
                }
                Strategy::Cookie => {
                    if let Some(cookies) = &self.cookies {
                        cookies.set_cookie(&self.cookie_name, locale.as_str());
                        stored = true;
                    }
                }
                Strategy::BaseLocale => {}
                Strategy::Url => {
                    if let Some(browsing) = &self.browsing {
                        let target = self.localize_url(&browsing.current_url(), &locale)?;
                        tracing::debug!(locale = %locale, to = %target, "Navigating to localized URL");
                        browsing.navigate(target.clone());
                        return Ok(SetLocaleOutcome::Navigated(target));
                    }
                }
            }
        }

        if !stored {
            return Err(LocaleError::NoStrategyCanSet);
        }

        tracing::debug!(locale = %locale, "Locale set");
        self.observers.send_replace(Some(locale));

        match &self.browsing {
            Some(browsing) => {
                browsing.reload();
                Ok(SetLocaleOutcome::Reloaded)
            }
            None => Ok(SetLocaleOutcome::Stored),
        }
    }

    /// Observe locales stored by `set_locale`.
    pub fn subscribe(&self) -> watch::Receiver<Option<Locale>> {
        self.observers.subscribe()
    }

    /// The origin hrefs are resolved against.
    pub fn get_url_origin(&self) -> String {
        if let Some(provider) = &self.overrides.origin {
            return provider.origin();
        }
        if let Some(ctx) = RequestContext::current() {
            return ctx.origin;
        }
        if let Some(browsing) = &self.browsing {
            return browsing.current_url().origin().ascii_serialization();
        }
        FALLBACK_ORIGIN.to_string()
    }

    /// The locale stored in the cookie store, if it names a configured
    /// locale.
    pub fn extract_locale_from_cookie(&self) -> Option<Locale> {
        let cookies = self.cookies.as_ref()?.cookies()?;
        let value = find_cookie(&cookies, &self.cookie_name)?;
        self.registry.assert_is_locale(value).ok()
    }

    /// The locale of an inbound request, walking the chain over the
    /// request's `Cookie` header, its URL and the global slot.
    ///
    /// A cookie naming an unknown locale is an error.
    pub fn extract_locale_from_request<B>(&self, request: &Request<B>) -> Result<Locale> {
        let mut request_url: Option<Url> = None;

        for &strategy in &self.strategy {
            let found = match strategy {
                Strategy::Cookie => request
                    .headers()
                    .get_all(header::COOKIE)
                    .iter()
                    .filter_map(|value| value.to_str().ok())
                    .find_map(|cookies| find_cookie(cookies, &self.cookie_name))
                    .map(str::to_string),
                Strategy::Url => {
                    if request_url.is_none() {
                        request_url = Some(crate::http::request::request_url(request)?);
                    }
                    request_url
                        .as_ref()
                        .and_then(|url| self.extract_locale_from_url(url))
                        .map(|l| l.as_str().to_string())
                }
                Strategy::GlobalVariable => self.slot.get().map(|l| l.as_str().to_string()),
                Strategy::BaseLocale => Some(self.base_locale().as_str().to_string()),
            };

            if let Some(raw) = found {
                let locale = self.checked(&raw)?;
                metrics::record_resolution(strategy.as_str());
                return Ok(locale);
            }
        }

        Err(self.no_locale_found())
    }

    fn checked(&self, value: &str) -> Result<Locale> {
        self.registry.assert_is_locale(value).inspect_err(|_| {
            metrics::record_resolution_failure("invalid_locale");
            tracing::warn!(value, "Rejected invalid locale");
        })
    }

    fn no_locale_found(&self) -> LocaleError {
        metrics::record_resolution_failure("no_locale");
        LocaleError::NoLocaleFound {
            chain: describe_chain(&self.strategy),
        }
    }
}
