//! # Bus builder.
//!
//! [`BusBuilder`] wires a [`Config`] and an optional [`Report`] sink into a [`Bus`].

use std::sync::Arc;

use crate::{
    engine::{Config, bus::Bus},
    reporters::{LogReporter, Report},
};

/// Builder for constructing a [`Bus`] with a custom reporter.
///
/// ```rust
/// use std::sync::Arc;
/// use relaybus::{Bus, Config, LogReporter};
///
/// let bus = Bus::builder(Config::default().named("ui"))
///     .with_reporter(Arc::new(LogReporter))
///     .build();
/// assert_eq!(bus.name(), "ui");
/// ```
pub struct BusBuilder {
    cfg: Config,
    reporter: Option<Arc<dyn Report>>,
}

impl BusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            reporter: None,
        }
    }

    /// Sets the failure reporter.
    ///
    /// Defaults to [`LogReporter`] when not set.
    pub fn with_reporter(mut self, reporter: Arc<dyn Report>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Builds the bus.
    pub fn build(self) -> Bus {
        let reporter: Arc<dyn Report> = match self.reporter {
            Some(reporter) => reporter,
            None => Arc::new(LogReporter),
        };
        tracing::debug!(bus = %self.cfg.name, reporter = reporter.name(), "bus created");
        Bus::new_internal(self.cfg, reporter)
    }
}
