use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::info;

use crate::{engine::MarketEngine, events::EventSink, selection::Dataset};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

pub type SharedEngine = Arc<Mutex<MarketEngine>>;

pub fn shared(engine: MarketEngine) -> SharedEngine {
    Arc::new(Mutex::new(engine))
}

/// Locks the engine. A refresh never leaves the caches half-written, so a
/// poisoned lock is still safe to reuse.
pub fn lock_engine(engine: &SharedEngine) -> MutexGuard<'_, MarketEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawns one timer task per dataset. Every tick refreshes that dataset
/// under the engine lock, so updates to one key never interleave.
///
/// Dropping the handles does not stop the tasks; abort them to shut down.
pub fn spawn_refreshers(
    engine: SharedEngine,
    period: Duration,
    sink: Arc<dyn EventSink>,
) -> Vec<JoinHandle<()>> {
    let period = period.max(Duration::from_millis(1));
    info!(period_ms = period.as_millis() as u64, "starting dataset refreshers");

    Dataset::ALL
        .into_iter()
        .map(|dataset| {
            tokio::spawn(run_refresher(
                dataset,
                Arc::clone(&engine),
                period,
                Arc::clone(&sink),
            ))
        })
        .collect()
}

async fn run_refresher(
    dataset: Dataset,
    engine: SharedEngine,
    period: Duration,
    sink: Arc<dyn EventSink>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let event = lock_engine(&engine).refresh(dataset);
        sink.publish(&event);
    }
}
