//! Locale primitives.
//!
//! # Contents
//! - registry.rs: `Locale`, `LocaleRegistry` (membership and assertion)
//! - strategy.rs: strategy tags and chain helpers
//! - slot.rs: process-wide fallback slot for `globalVariable`
//! - cookie.rs: cookie wire format

pub mod cookie;
pub mod registry;
pub mod slot;
pub mod strategy;

pub use registry::{Locale, LocaleRegistry};
pub use slot::LocaleSlot;
pub use strategy::Strategy;
