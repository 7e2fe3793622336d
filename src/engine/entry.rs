//! # Listener entries.
//!
//! One [`Entry`] per registration. Entries are immutable once inserted except
//! for the one-shot claim flag, and are shared between the live registry and
//! any in-flight dispatch snapshots.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::ListenerError;
use crate::listeners::{Lifetime, Listener, ListenerId, Priority};

pub(crate) struct Entry<T> {
    pub(crate) id: ListenerId,
    pub(crate) listener: Listener<T>,
    pub(crate) priority: Priority,
    pub(crate) once: bool,
    lifetime: Option<Arc<dyn Lifetime>>,
    fired: AtomicBool,
}

impl<T> Entry<T> {
    pub(crate) fn new(
        id: ListenerId,
        listener: Listener<T>,
        priority: Priority,
        lifetime: Option<Arc<dyn Lifetime>>,
        once: bool,
    ) -> Self {
        Self {
            id,
            listener,
            priority,
            once,
            lifetime,
            fired: AtomicBool::new(false),
        }
    }

    /// `true` if the entry is owner-bound and the owner is gone. Never cached.
    #[inline]
    pub(crate) fn is_expired(&self) -> bool {
        self.lifetime.as_ref().is_some_and(|l| !l.is_alive())
    }

    /// Claims the single invocation of a one-shot entry.
    ///
    /// Returns `false` if another dispatch already claimed it.
    #[inline]
    pub(crate) fn claim(&self) -> bool {
        !self.fired.swap(true, Ordering::AcqRel)
    }

    /// Runs the callback, converting panics and `Err` returns into [`ListenerError`].
    pub(crate) fn invoke(&self, payload: &T) -> Result<(), ListenerError> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.listener.call(payload))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(ListenerError::Failed { error }),
            Err(panic_err) => Err(ListenerError::from_panic(&*panic_err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    fn entry(listener: Listener<u32>, lifetime: Option<Arc<dyn Lifetime>>) -> Entry<u32> {
        Entry::new(ListenerId(1), listener, Priority::Normal, lifetime, false)
    }

    #[test]
    fn test_invoke_catches_panic() {
        let e = entry(Listener::new(|_: &u32| panic!("kaboom")), None);
        assert_eq!(
            e.invoke(&0),
            Err(ListenerError::Panicked {
                message: "kaboom".into()
            })
        );
    }

    #[test]
    fn test_invoke_reports_err() {
        let e = entry(Listener::fallible(|_: &u32| Err("nope")), None);
        assert_eq!(
            e.invoke(&0),
            Err(ListenerError::Failed {
                error: "nope".into()
            })
        );
    }

    #[test]
    fn test_claim_is_single_use() {
        let e = entry(Listener::new(|_: &u32| {}), None);
        assert!(e.claim());
        assert!(!e.claim());
    }

    #[test]
    fn test_expiry_is_rechecked() {
        let token = CancellationToken::new();
        let e = entry(Listener::new(|_: &u32| {}), Some(Arc::new(token.clone())));
        assert!(!e.is_expired());
        token.cancel();
        assert!(e.is_expired());
    }
}
