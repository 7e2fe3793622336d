//! # Example: async_publish
//!
//! Dispatching from async code without blocking the runtime.
//!
//! Demonstrates how to:
//! - Use [`Bus::publish_async`] to run listeners on tokio's blocking pool.
//! - Await a one-shot listener's side effect through a oneshot channel.
//!
//! ## Run
//! ```bash
//! cargo run --example async_publish
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use relaybus::{Bus, Channel};
use tokio::sync::oneshot;

const JOB_DONE: Channel<String> = Channel::constant("job.done");
const SHUTDOWN: Channel<()> = Channel::constant("shutdown");

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relaybus=debug".into()),
        )
        .init();

    let bus = Bus::new();

    // 1. A slow listener: runs on the blocking pool, not on a runtime worker
    bus.subscribe(&JOB_DONE, |job: &String| {
        std::thread::sleep(Duration::from_millis(50));
        println!("[archive] stored {job}");
    })?;

    // 2. One-shot listener forwarding the shutdown signal into async land
    let (tx, rx) = oneshot::channel::<()>();
    let tx = Arc::new(Mutex::new(Some(tx)));
    bus.subscribe_once(&SHUTDOWN, move |_: &()| {
        if let Some(tx) = tx.lock().take() {
            let _ = tx.send(());
        }
    })?;

    // 3. Publish concurrently and wait for all dispatches
    let jobs = ["alpha", "beta", "gamma"].map(|name| bus.publish_async(&JOB_DONE, name.to_string()));
    futures::future::join_all(jobs).await;

    bus.notify_async(&SHUTDOWN).await;
    rx.await?;
    println!("shutdown observed; once listeners left: {}", bus.once_listener_count(&SHUTDOWN));
    Ok(())
}
