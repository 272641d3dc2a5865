use std::sync::MutexGuard;

use runtime::{lock_engine, EventSink, MarketEngine, RuntimeEvent, SharedEngine};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    engine: SharedEngine,
    events_tx: broadcast::Sender<RuntimeEvent>,
}

impl AppState {
    pub fn new(engine: SharedEngine) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { engine, events_tx }
    }

    pub fn engine(&self) -> &SharedEngine {
        &self.engine
    }

    pub fn lock(&self) -> MutexGuard<'_, MarketEngine> {
        lock_engine(&self.engine)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events_tx.subscribe()
    }

    /// True when `event` still belongs to the active selection.
    pub fn is_current(&self, event: &RuntimeEvent) -> bool {
        self.lock().is_current(&event.key)
    }
}

impl EventSink for AppState {
    fn publish(&self, event: &RuntimeEvent) {
        // No subscribers is normal between WebSocket sessions.
        let _ = self.events_tx.send(event.clone());
    }
}
