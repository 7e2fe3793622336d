//! # Example: basic
//!
//! Priority-ordered dispatch with persistent and one-shot listeners.
//!
//! Demonstrates how to:
//! - Declare typed channels with [`Channel::constant`].
//! - Register listeners at different [`Priority`] tiers.
//! - Register a one-shot listener and cancel another through its [`Subscription`](relaybus::Subscription).
//!
//! ## Flow
//! ```text
//! publish(SCORE, 10)
//!     ├─► [Critical]   anti-cheat check
//!     ├─► [Normal]     scoreboard
//!     ├─► [Background] analytics
//!     └─► [once]       first-score banner   (removed afterwards)
//! notify(GAME_OVER)
//!     └─► [once]       farewell             (removed afterwards)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use relaybus::{Bus, Channel, Config, Priority};

const SCORE: Channel<u32> = Channel::constant("score.changed");
const GAME_OVER: Channel<()> = Channel::constant("game.over");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaybus=trace".into()),
        )
        .init();

    // 1. Build the bus
    let bus = Bus::builder(Config::default().named("game")).build();

    // 2. Persistent listeners, registered out of tier order on purpose
    bus.subscribe(&SCORE, |score: &u32| println!("[scoreboard] +{score}"))?;
    bus.subscribe_with(
        &SCORE,
        |score: &u32| println!("[analytics] score event {score}"),
        Priority::Background,
    )?;
    bus.subscribe_with(
        &SCORE,
        |score: &u32| println!("[anti-cheat] checking {score}"),
        Priority::Critical,
    )?;

    // 3. One-shot listeners
    bus.subscribe_once(&SCORE, |_: &u32| println!("[banner] first points!"))?;
    bus.subscribe_once(&GAME_OVER, |_: &()| println!("[farewell] thanks for playing"))?;
    let cancelled = bus.subscribe_once(&GAME_OVER, |_: &()| println!("never printed"))?;
    cancelled.dispose();

    // 4. Publish
    bus.publish(&SCORE, &10);
    bus.publish(&SCORE, &25);
    bus.notify(&GAME_OVER);
    bus.notify(&GAME_OVER);

    println!(
        "score listeners: {} persistent, {} one-shot; channels: {}",
        bus.listener_count(&SCORE),
        bus.once_listener_count(&SCORE),
        bus.channel_count()
    );
    Ok(())
}
