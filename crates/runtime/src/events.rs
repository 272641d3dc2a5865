use std::sync::Arc;

use serde::Serialize;

use crate::selection::{CacheKey, Dataset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStage {
    /// Cache miss: the value was generated from scratch.
    Created,
    /// Cache hit: the previous value was advanced by one tick.
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuntimeEvent {
    pub tick: u64,
    pub key: CacheKey,
    pub stage: RefreshStage,
}

impl RuntimeEvent {
    pub fn new(tick: u64, key: CacheKey, stage: RefreshStage) -> Self {
        Self { tick, key, stage }
    }

    pub fn dataset(&self) -> Dataset {
        self.key.dataset()
    }
}

/// Receives every refresh the engine performs.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: &RuntimeEvent);
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: &RuntimeEvent) {
        (**self).publish(event);
    }
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn publish(&self, event: &RuntimeEvent) {
        self.0.publish(event);
        self.1.publish(event);
    }
}
