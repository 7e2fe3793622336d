//! # Process-wide bus.
//!
//! Applications that want one shared bus install it once at startup; library
//! code then reaches it through [`bus`]. Tests should build isolated [`Bus`]
//! values instead of touching the global one.
//!
//! ```rust
//! use relaybus::{Bus, Config, global};
//!
//! let _ = global::install(Bus::builder(Config::default().named("app")).build());
//! assert_eq!(global::bus().name(), "app");
//! ```

use std::sync::OnceLock;

use crate::engine::bus::Bus;

static GLOBAL: OnceLock<Bus> = OnceLock::new();

/// Installs `bus` as the process-wide instance.
///
/// # Errors
/// Returns `bus` back if an instance is already installed (or was lazily created by [`bus`]).
pub fn install(bus: Bus) -> Result<(), Bus> {
    GLOBAL.set(bus)
}

/// Returns the process-wide bus, creating a default one on first use.
pub fn bus() -> &'static Bus {
    GLOBAL.get_or_init(Bus::new)
}
