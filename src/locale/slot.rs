//! Process-wide fallback locale used by the `globalVariable` strategy.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use super::Locale;

/// A single-slot locale store.
///
/// Reads are lock-free. The slot is shared by every caller of the owning
/// runtime, so in a multi-tenant server only one writer per process should
/// use it; concurrent writers race and the last write wins. Request-bound
/// locales belong in [`crate::runtime::RequestContext`] instead.
#[derive(Debug)]
pub struct LocaleSlot {
    current: ArcSwapOption<Locale>,
}

impl LocaleSlot {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    pub fn get(&self) -> Option<Locale> {
        self.current.load_full().map(|l| (*l).clone())
    }

    pub fn set(&self, locale: Locale) {
        self.current.store(Some(Arc::new(locale)));
    }

    pub fn clear(&self) {
        self.current.store(None);
    }
}

impl Default for LocaleSlot {
    fn default() -> Self {
        Self::new()
    }
}
