//! # Bus configuration.
//!
//! Provides [`Config`] centralized settings for one [`Bus`](crate::Bus).
//!
//! Config is used in two ways:
//! 1. **Bus creation**: `Bus::builder(config).build()`
//! 2. **Registration defaults**: `Bus::subscribe` without explicit options uses
//!    [`Config::default_priority`].

use std::borrow::Cow;

use crate::listeners::Priority;

/// Configuration for a bus instance.
///
/// ## Field semantics
/// - `name`: label attached to the bus's own log records (`bus = ...`)
/// - `default_priority`: tier used when a registration does not request one
#[derive(Clone, Debug)]
pub struct Config {
    /// Bus name for log records. Useful when several isolated buses coexist.
    pub name: Cow<'static, str>,

    /// Tier applied by `subscribe`/`subscribe_once` and by options without a priority.
    pub default_priority: Priority,
}

impl Config {
    /// Returns a copy with a different name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `name = "bus"`
    /// - `default_priority = Priority::Normal`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("bus"),
            default_priority: Priority::Normal,
        }
    }
}
