use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::error::BusError;

/// Strongly-typed channel identifier.
///
/// Two channels are the same topic iff their keys are equal. The payload type
/// `T` is part of the static contract: a `Channel<T>` only accepts `T` listeners
/// and `T` payloads. Parameterless events use `Channel<()>`.
///
/// The bus additionally checks at registration time that every listener under
/// one key agrees on `T` (see [`BusError::PayloadMismatch`]).
pub struct Channel<T> {
    key: Cow<'static, str>,
    _payload: PhantomData<fn(T)>,
}

impl<T> Channel<T> {
    /// Creates a channel from a runtime key.
    ///
    /// # Errors
    /// Returns [`BusError::InvalidChannel`] if `key` is empty.
    ///
    /// ```rust
    /// use relaybus::{BusError, Channel};
    ///
    /// let ch = Channel::<String>::new(format!("player.{}", 7)).unwrap();
    /// assert_eq!(ch.key(), "player.7");
    /// assert_eq!(Channel::<String>::new("").unwrap_err(), BusError::InvalidChannel);
    /// ```
    pub fn new(key: impl Into<Cow<'static, str>>) -> Result<Self, BusError> {
        let key = key.into();
        if key.is_empty() {
            return Err(BusError::InvalidChannel);
        }
        Ok(Self {
            key,
            _payload: PhantomData,
        })
    }

    /// Creates a channel from a static key, usable in `const` items.
    ///
    /// # Panics
    /// Panics if `key` is empty. In a `const` context this is a compile error.
    pub const fn constant(key: &'static str) -> Self {
        assert!(!key.is_empty(), "channel key must not be empty");
        Self {
            key: Cow::Borrowed(key),
            _payload: PhantomData,
        }
    }

    /// Returns the channel key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> PartialEq for Channel<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Channel<T> {}

impl<T> Hash for Channel<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("key", &self.key)
            .field("payload", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Display for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const READY: Channel<()> = Channel::constant("ready");

    #[test]
    fn test_empty_key_is_rejected() {
        assert_eq!(Channel::<u8>::new("").unwrap_err(), BusError::InvalidChannel);
        assert_eq!(
            Channel::<u8>::new(String::new()).unwrap_err(),
            BusError::InvalidChannel
        );
    }

    #[test]
    #[should_panic(expected = "channel key must not be empty")]
    fn test_constant_rejects_empty_key_at_runtime() {
        let key: &'static str = Box::leak(String::new().into_boxed_str());
        let _ = Channel::<u8>::constant(key);
    }

    #[test]
    fn test_equality_is_by_key() {
        let a = Channel::<u32>::new("score").unwrap();
        let b = Channel::<u32>::new(String::from("score")).unwrap();
        let c = Channel::<u32>::new("lives").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_constant_and_display() {
        assert_eq!(READY.key(), "ready");
        assert_eq!(READY.to_string(), "ready");
        assert!(format!("{READY:?}").contains("()"));
    }
}
