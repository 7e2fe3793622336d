use std::fmt;
use std::sync::Arc;

use super::{Lifetime, Priority};

/// Per-registration options.
///
/// ```rust
/// use std::sync::Arc;
/// use relaybus::{Priority, SubscribeOptions};
///
/// let owner = Arc::new(());
/// let opts = SubscribeOptions::new()
///     .with_priority(Priority::High)
///     .with_owner(&owner);
/// assert_eq!(opts.priority(), Some(Priority::High));
/// assert!(opts.is_bound());
/// ```
#[derive(Clone, Default)]
pub struct SubscribeOptions {
    pub(crate) priority: Option<Priority>,
    pub(crate) lifetime: Option<Arc<dyn Lifetime>>,
}

impl SubscribeOptions {
    /// Options with the bus default priority and no owner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dispatch tier. Unset means [`Config::default_priority`](crate::Config::default_priority).
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Binds the listener to `owner` through a `Weak` reference.
    pub fn with_owner<O>(self, owner: &Arc<O>) -> Self
    where
        O: ?Sized + Send + Sync + 'static,
    {
        self.with_lifetime(Arc::downgrade(owner))
    }

    /// Binds the listener to an arbitrary liveness probe.
    pub fn with_lifetime(mut self, lifetime: impl Lifetime) -> Self {
        self.lifetime = Some(Arc::new(lifetime));
        self
    }

    /// Returns the explicitly requested priority, if any.
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns `true` if the listener will be owner-bound.
    pub fn is_bound(&self) -> bool {
        self.lifetime.is_some()
    }
}

impl From<Priority> for SubscribeOptions {
    fn from(priority: Priority) -> Self {
        Self::new().with_priority(priority)
    }
}

impl fmt::Debug for SubscribeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscribeOptions")
            .field("priority", &self.priority)
            .field("bound", &self.is_bound())
            .finish()
    }
}
