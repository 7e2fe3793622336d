//! # Example: owner_bound
//!
//! Listeners whose lifetime follows an owner object.
//!
//! Demonstrates how to:
//! - Bind a listener to an `Arc` owner with [`SubscribeOptions::with_owner`].
//! - Bind a listener to a [`CancellationToken`] held through a drop guard.
//! - Plug a custom [`Report`] sink to observe failures and expired owners.
//!
//! ## Flow
//! ```text
//! publish(TICK, 1)  ─► hud ✓  panel ✓  flaky ✗ (reported)
//! drop(hud)
//! publish(TICK, 2)  ─► hud expired (reported, pruned)  panel ✓  flaky ✗
//! drop(panel)       ─► token cancelled
//! publish(TICK, 3)  ─► panel expired (reported, pruned)  flaky ✗
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example owner_bound
//! ```

use std::sync::Arc;

use relaybus::{
    Bus, Channel, Config, Listener, ListenerFailure, ListenerId, Report, SubscribeOptions,
};
use tokio_util::sync::{CancellationToken, DropGuard};

const TICK: Channel<u64> = Channel::constant("tick");

/// Prints every report instead of logging it.
struct Console;

impl Report for Console {
    fn on_failure(&self, failure: &ListenerFailure) {
        println!(
            "[report] {} on {:?} failed: {}",
            failure.listener,
            failure.channel,
            failure.error.as_message()
        );
    }

    fn on_expired(&self, channel: &str, listener: ListenerId) {
        println!("[report] {listener} on {channel:?} lost its owner");
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

/// A widget that stops listening once dropped.
struct Panel {
    _binding: DropGuard,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = Bus::builder(Config::default().named("ui"))
        .with_reporter(Arc::new(Console))
        .build();

    // 1. Weak-reference binding
    let hud = Arc::new(String::from("hud"));
    bus.subscribe_with(
        &TICK,
        |tick: &u64| println!("[hud] tick {tick}"),
        SubscribeOptions::new().with_owner(&hud),
    )?;

    // 2. Token binding
    let token = CancellationToken::new();
    let panel = Panel {
        _binding: token.clone().drop_guard(),
    };
    bus.subscribe_with(
        &TICK,
        |tick: &u64| println!("[panel] tick {tick}"),
        SubscribeOptions::new().with_lifetime(token),
    )?;

    // 3. A listener that always fails; dispatch carries on regardless
    bus.subscribe(
        &TICK,
        Listener::fallible(|tick: &u64| Err(format!("tick {tick} rejected"))),
    )?;

    bus.publish(&TICK, &1);
    drop(hud);
    bus.publish(&TICK, &2);
    drop(panel);
    bus.publish(&TICK, &3);

    println!("remaining listeners on tick: {}", bus.listener_count(&TICK));
    Ok(())
}
