//! # Subscription handles.
//!
//! Every registration returns a [`Subscription`]: a single-use cancellation
//! capability. Disposing it removes exactly the registration it was issued for.
//!
//! ## Rules
//! - `dispose()` runs the cancellation at most once; later calls are no-ops.
//! - Dropping a `Subscription` does **not** unsubscribe. Use
//!   [`Subscription::drop_guard`] for scope-bound registrations.
//! - The handle only holds a `Weak` reference to the bus, so it neither keeps
//!   the bus alive nor the listener's owner.

use std::fmt;

use parking_lot::Mutex;

use crate::listeners::ListenerId;

type Cancel = Box<dyn FnOnce() + Send>;

/// Cancellation handle for one registration.
pub struct Subscription {
    id: ListenerId,
    cancel: Mutex<Option<Cancel>>,
}

impl Subscription {
    pub(crate) fn new(id: ListenerId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// Returns the id of the registration this handle cancels.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Removes the registration. Idempotent.
    pub fn dispose(&self) {
        let cancel = self.cancel.lock().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    /// Returns `true` once [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.cancel.lock().is_none()
    }

    /// Converts the handle into a guard that disposes on drop.
    pub fn drop_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { inner: Some(self) }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Disposes the wrapped [`Subscription`] when dropped.
#[must_use = "dropping the guard immediately unsubscribes"]
#[derive(Debug)]
pub struct SubscriptionGuard {
    inner: Option<Subscription>,
}

impl SubscriptionGuard {
    /// Returns the underlying handle without disposing it.
    pub fn disarm(mut self) -> Subscription {
        self.inner
            .take()
            .expect("guard holds its subscription until dropped or disarmed")
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(sub) = self.inner.take() {
            sub.dispose();
        }
    }
}
