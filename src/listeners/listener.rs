//! # Shared listener callbacks.
//!
//! [`Listener`] wraps a callback `Fn(&T)` behind an `Arc`, giving it an identity:
//! clones of one `Listener` are the *same* listener, which is what
//! [`Bus::unsubscribe`](crate::Bus::unsubscribe) matches on.
//!
//! Plain closures can be passed anywhere a listener is expected (see
//! [`IntoListener`]); build a `Listener` explicitly only when you need to
//! unsubscribe by identity later.
//!
//! ## Example
//! ```rust
//! use relaybus::Listener;
//!
//! let on_score = Listener::new(|score: &u32| println!("score={score}"));
//! let same = on_score.clone();
//! let other = Listener::new(|score: &u32| println!("score={score}"));
//!
//! assert!(on_score.same(&same));
//! assert!(!on_score.same(&other));
//! ```

use std::fmt;
use std::sync::Arc;

type Callback<T> = dyn Fn(&T) -> Result<(), String> + Send + Sync;

/// Unique id of one registration.
///
/// Monotonically assigned by the [`Bus`](crate::Bus) that created the registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Returns the raw numeric id.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Shared, identity-carrying callback for payloads of type `T`.
pub struct Listener<T> {
    callback: Arc<Callback<T>>,
}

impl<T: 'static> Listener<T> {
    /// Wraps an infallible callback.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(move |payload: &T| {
                f(payload);
                Ok(())
            }),
        }
    }

    /// Wraps a fallible callback.
    ///
    /// An `Err` is reported as [`ListenerError::Failed`](crate::ListenerError::Failed)
    /// and, like a panic, never interrupts dispatch to other listeners.
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        Self {
            callback: Arc::new(move |payload: &T| f(payload).map_err(|e| e.to_string())),
        }
    }
}

impl<T> Listener<T> {
    /// Returns `true` if both handles refer to the same callback.
    #[inline]
    pub fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }

    #[inline]
    pub(crate) fn call(&self, payload: &T) -> Result<(), String> {
        (self.callback)(payload)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("payload", &std::any::type_name::<T>())
            .field("callback", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Conversion into a [`Listener`].
///
/// Implemented for `Listener<T>` itself and for every `Fn(&T) + Send + Sync + 'static`.
/// Closure parameters need a type annotation (`|v: &u32| ...`).
pub trait IntoListener<T> {
    /// Performs the conversion.
    fn into_listener(self) -> Listener<T>;
}

impl<T: 'static> IntoListener<T> for Listener<T> {
    #[inline]
    fn into_listener(self) -> Listener<T> {
        self
    }
}

impl<T, F> IntoListener<T> for F
where
    T: 'static,
    F: Fn(&T) + Send + Sync + 'static,
{
    #[inline]
    fn into_listener(self) -> Listener<T> {
        Listener::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_identity_survives_clone() {
        let a = Listener::new(|_: &u8| {});
        let b = a.clone();
        let c = Listener::new(|_: &u8| {});
        assert!(a.same(&b));
        assert!(!a.same(&c));
    }

    #[test]
    fn test_call_forwards_payload() {
        let seen = Arc::new(AtomicU32::new(0));
        let seen_clone = Arc::clone(&seen);
        let listener: Listener<u32> = (move |v: &u32| {
            seen_clone.fetch_add(*v, Ordering::SeqCst);
        })
        .into_listener();

        assert_eq!(listener.call(&3), Ok(()));
        assert_eq!(listener.call(&4), Ok(()));
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_fallible_maps_error_to_text() {
        let listener = Listener::fallible(|v: &i32| {
            if *v < 0 {
                Err(format!("negative: {v}"))
            } else {
                Ok(())
            }
        });
        assert_eq!(listener.call(&1), Ok(()));
        assert_eq!(listener.call(&-2), Err("negative: -2".to_string()));
    }

    #[test]
    fn test_listener_id_display() {
        assert_eq!(ListenerId(12).to_string(), "listener-12");
        assert_eq!(ListenerId(12).get(), 12);
    }
}
