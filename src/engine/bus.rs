//! # The bus: registration and dispatch.
//!
//! [`Bus`] owns two registries sharing one key space: persistent listeners and
//! one-shot listeners. `publish` fans a payload out to both.
//!
//! ## Dispatch
//! ```text
//! publish(channel, &payload)
//!   for registry in [persistent, once]:
//!     snapshot = bucket(channel).snapshot()       (Arc clone, lock held briefly)
//!     for entry in snapshot:                      (Critical ─► ... ─► Background)
//!       ├─ owner expired?  ─► Report::on_expired, mark for removal, skip
//!       ├─ one-shot?       ─► claim (atomic), skip if already claimed
//!       ├─ invoke (catch_unwind) ─► Err ─► Report::on_failure
//!       └─ one-shot?       ─► mark for removal
//!     prune(marked)                               (empties bucket ─► bucket removed)
//! ```
//!
//! ## Rules
//! - `publish` never panics and never returns an error to its caller.
//! - Registrations made during a dispatch only affect later publishes; removals
//!   made during a dispatch do not skip listeners already in the snapshot.
//! - A one-shot listener runs at most once, even under concurrent publishes.
//! - Owner liveness is re-checked on every dispatch.
//! - No global lock: channel A never blocks channel B.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::{
    channels::Channel,
    engine::{
        Config,
        builder::BusBuilder,
        entry::Entry,
        registry::{Lookup, Registry, RegistryKind},
        subscription::Subscription,
    },
    error::BusError,
    listeners::{IntoListener, Listener, ListenerId, SubscribeOptions},
    reporters::{ListenerFailure, Report},
};

pub(crate) struct Inner {
    cfg: Config,
    reporter: Arc<dyn Report>,
    persistent: Registry,
    once: Registry,
    next_id: AtomicU64,
}

impl Inner {
    fn registry(&self, kind: RegistryKind) -> &Registry {
        match kind {
            RegistryKind::Persistent => &self.persistent,
            RegistryKind::Once => &self.once,
        }
    }

    fn dispatch<T: 'static>(&self, registry: &Registry, channel: &Channel<T>, payload: &T) {
        let key = channel.key();
        let bucket = match registry.lookup::<T>(key) {
            Lookup::Found(bucket) => bucket,
            Lookup::Missing => return,
            Lookup::Mismatch { found } => {
                tracing::warn!(
                    bus = %self.cfg.name,
                    channel = key,
                    registry = registry.kind().as_label(),
                    expected = std::any::type_name::<T>(),
                    found,
                    "payload type mismatch, publish ignored"
                );
                return;
            }
        };

        let snapshot = bucket.snapshot();
        let mut dead: Vec<ListenerId> = Vec::new();

        for entry in snapshot.iter() {
            if entry.is_expired() {
                self.report_expired(key, entry.id);
                dead.push(entry.id);
                continue;
            }
            if entry.once && !entry.claim() {
                continue;
            }
            if let Err(error) = entry.invoke(payload) {
                self.report_failure(ListenerFailure {
                    channel: key.to_owned(),
                    listener: entry.id,
                    priority: entry.priority,
                    once: entry.once,
                    error,
                });
            }
            if entry.once {
                dead.push(entry.id);
            }
        }

        if !dead.is_empty() {
            registry.prune(key, &bucket, |e| dead.contains(&e.id));
        }
    }

    fn report_failure(&self, failure: ListenerFailure) {
        let reporter = &self.reporter;
        if panic::catch_unwind(AssertUnwindSafe(|| reporter.on_failure(&failure))).is_err() {
            tracing::error!(
                bus = %self.cfg.name,
                reporter = reporter.name(),
                channel = %failure.channel,
                "reporter panicked while handling a listener failure"
            );
        }
    }

    fn report_expired(&self, key: &str, id: ListenerId) {
        let reporter = &self.reporter;
        if panic::catch_unwind(AssertUnwindSafe(|| reporter.on_expired(key, id))).is_err() {
            tracing::error!(
                bus = %self.cfg.name,
                reporter = reporter.name(),
                channel = key,
                "reporter panicked while handling an expired listener"
            );
        }
    }
}

/// Typed, priority-ordered publish/subscribe bus.
///
/// Cheap to clone: clones share the same registries.
///
/// ## Example
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use relaybus::{Bus, Channel, Priority, SubscribeOptions};
///
/// const SCORE: Channel<u32> = Channel::constant("score");
///
/// let bus = Bus::new();
/// let log = Arc::new(Mutex::new(Vec::new()));
///
/// let l = Arc::clone(&log);
/// bus.subscribe(&SCORE, move |s: &u32| l.lock().unwrap().push(format!("normal {s}")))?;
/// let l = Arc::clone(&log);
/// bus.subscribe_with(
///     &SCORE,
///     move |s: &u32| l.lock().unwrap().push(format!("critical {s}")),
///     SubscribeOptions::new().with_priority(Priority::Critical),
/// )?;
///
/// bus.publish(&SCORE, &10);
/// assert_eq!(*log.lock().unwrap(), vec!["critical 10", "normal 10"]);
/// # Ok::<(), relaybus::BusError>(())
/// ```
#[derive(Clone)]
pub struct Bus {
    inner: Arc<Inner>,
}

impl Bus {
    /// Creates a bus with [`Config::default`] and the default reporter.
    pub fn new() -> Self {
        Self::builder(Config::default()).build()
    }

    /// Starts building a bus with the given configuration.
    pub fn builder(cfg: Config) -> BusBuilder {
        BusBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, reporter: Arc<dyn Report>) -> Self {
        Self {
            inner: Arc::new(Inner {
                cfg,
                reporter,
                persistent: Registry::new(RegistryKind::Persistent),
                once: Registry::new(RegistryKind::Once),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Returns the configured bus name.
    pub fn name(&self) -> &str {
        &self.inner.cfg.name
    }

    // ---- Registration ----

    /// Registers a persistent listener with the default priority.
    ///
    /// # Errors
    /// [`BusError::PayloadMismatch`] if `channel`'s key already carries another payload type.
    pub fn subscribe<T: 'static>(
        &self,
        channel: &Channel<T>,
        listener: impl IntoListener<T>,
    ) -> Result<Subscription, BusError> {
        self.register(RegistryKind::Persistent, channel, listener, SubscribeOptions::new())
    }

    /// Registers a persistent listener with explicit priority and/or owner.
    ///
    /// # Errors
    /// [`BusError::PayloadMismatch`] if `channel`'s key already carries another payload type.
    pub fn subscribe_with<T: 'static>(
        &self,
        channel: &Channel<T>,
        listener: impl IntoListener<T>,
        opts: impl Into<SubscribeOptions>,
    ) -> Result<Subscription, BusError> {
        self.register(RegistryKind::Persistent, channel, listener, opts.into())
    }

    /// Registers a one-shot listener: removed right after its first invocation.
    ///
    /// # Errors
    /// [`BusError::PayloadMismatch`] if `channel`'s key already carries another payload type.
    pub fn subscribe_once<T: 'static>(
        &self,
        channel: &Channel<T>,
        listener: impl IntoListener<T>,
    ) -> Result<Subscription, BusError> {
        self.register(RegistryKind::Once, channel, listener, SubscribeOptions::new())
    }

    /// Registers a one-shot listener with explicit priority and/or owner.
    ///
    /// # Errors
    /// [`BusError::PayloadMismatch`] if `channel`'s key already carries another payload type.
    pub fn subscribe_once_with<T: 'static>(
        &self,
        channel: &Channel<T>,
        listener: impl IntoListener<T>,
        opts: impl Into<SubscribeOptions>,
    ) -> Result<Subscription, BusError> {
        self.register(RegistryKind::Once, channel, listener, opts.into())
    }

    fn register<T: 'static>(
        &self,
        kind: RegistryKind,
        channel: &Channel<T>,
        listener: impl IntoListener<T>,
        opts: SubscribeOptions,
    ) -> Result<Subscription, BusError> {
        let id = ListenerId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let priority = opts.priority.unwrap_or(self.inner.cfg.default_priority);
        let entry = Entry::new(
            id,
            listener.into_listener(),
            priority,
            opts.lifetime,
            kind == RegistryKind::Once,
        );

        self.inner
            .registry(kind)
            .insert(channel.key(), Arc::new(entry))?;
        tracing::trace!(
            bus = %self.inner.cfg.name,
            channel = channel.key(),
            registry = kind.as_label(),
            listener = %id,
            priority = priority.as_label(),
            "listener registered"
        );

        let bus: Weak<Inner> = Arc::downgrade(&self.inner);
        let key = channel.key().to_owned();
        Ok(Subscription::new(id, move || {
            if let Some(inner) = bus.upgrade() {
                inner
                    .registry(kind)
                    .remove_where::<T>(&key, |e| e.id == id);
            }
        }))
    }

    // ---- Dispatch ----

    /// Delivers `payload` to every listener on `channel`.
    ///
    /// Persistent listeners run first, then one-shot listeners; each group in
    /// priority order. Listener failures are reported, never returned.
    pub fn publish<T: 'static>(&self, channel: &Channel<T>, payload: &T) {
        self.inner.dispatch(&self.inner.persistent, channel, payload);
        self.inner.dispatch(&self.inner.once, channel, payload);
    }

    /// Fires a parameterless channel.
    pub fn notify(&self, channel: &Channel<()>) {
        self.publish(channel, &());
    }

    // ---- Removal ----

    /// Removes every persistent registration of `listener` on `channel`.
    ///
    /// Entries whose owner has expired are pruned as well. No-op if nothing matches.
    pub fn unsubscribe<T: 'static>(&self, channel: &Channel<T>, listener: &Listener<T>) {
        self.inner
            .persistent
            .remove_where::<T>(channel.key(), |e| {
                e.listener.same(listener) || e.is_expired()
            });
    }

    /// Removes every one-shot registration of `listener` on `channel`.
    ///
    /// Entries whose owner has expired are pruned as well. No-op if nothing matches.
    pub fn unsubscribe_once<T: 'static>(&self, channel: &Channel<T>, listener: &Listener<T>) {
        self.inner.once.remove_where::<T>(channel.key(), |e| {
            e.listener.same(listener) || e.is_expired()
        });
    }

    /// Removes all registrations, persistent and one-shot, on `channel`.
    pub fn unsubscribe_all<T>(&self, channel: &Channel<T>) {
        let removed = self.inner.persistent.remove_key(channel.key())
            + self.inner.once.remove_key(channel.key());
        if removed > 0 {
            tracing::debug!(
                bus = %self.inner.cfg.name,
                channel = channel.key(),
                removed,
                "channel cleared"
            );
        }
    }

    /// Drops every registration on every channel.
    pub fn clear(&self) {
        let removed = self.inner.persistent.clear() + self.inner.once.clear();
        tracing::debug!(bus = %self.inner.cfg.name, removed, "bus cleared");
    }

    // ---- Introspection ----

    /// Number of live persistent registrations on `channel`.
    pub fn listener_count<T>(&self, channel: &Channel<T>) -> usize {
        self.inner.persistent.len_of(channel.key())
    }

    /// Number of pending one-shot registrations on `channel`.
    pub fn once_listener_count<T>(&self, channel: &Channel<T>) -> usize {
        self.inner.once.len_of(channel.key())
    }

    /// `true` if `channel` has any registration, persistent or one-shot.
    pub fn has_listeners<T>(&self, channel: &Channel<T>) -> bool {
        self.listener_count(channel) + self.once_listener_count(channel) > 0
    }

    /// Number of distinct channel keys with at least one registration.
    pub fn channel_count(&self) -> usize {
        let mut keys: HashSet<String> = self.inner.persistent.keys().into_iter().collect();
        keys.extend(self.inner.once.keys());
        keys.len()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("name", &self.inner.cfg.name)
            .field("reporter", &self.inner.reporter.name())
            .field("channels", &self.channel_count())
            .finish()
    }
}

#[cfg(feature = "async")]
mod dispatch_async {
    use futures::FutureExt;

    use super::Bus;
    use crate::channels::Channel;

    impl Bus {
        /// Runs [`publish`](Bus::publish) on tokio's blocking pool.
        ///
        /// Dispatch starts immediately; the returned future resolves once every
        /// listener has run. Ordering and failure semantics are those of `publish`.
        ///
        /// # Panics
        /// Panics if called outside a tokio runtime.
        pub fn publish_async<T>(
            &self,
            channel: &Channel<T>,
            payload: T,
        ) -> impl Future<Output = ()> + Send + use<T>
        where
            T: Send + Sync + 'static,
        {
            let bus = self.clone();
            let channel = channel.clone();
            tokio::task::spawn_blocking(move || bus.publish(&channel, &payload)).map(|res| {
                if let Err(err) = res {
                    tracing::error!(error = %err, "async publish did not complete");
                }
            })
        }

        /// Runs [`notify`](Bus::notify) on tokio's blocking pool.
        ///
        /// # Panics
        /// Panics if called outside a tokio runtime.
        pub fn notify_async(&self, channel: &Channel<()>) -> impl Future<Output = ()> + Send + use<> {
            self.publish_async(channel, ())
        }
    }
}
