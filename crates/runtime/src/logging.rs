use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::events::{EventSink, RuntimeEvent};

/// Writes each refresh as a structured `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: &RuntimeEvent) {
        info!(
            tick = event.tick,
            dataset = event.dataset().as_str(),
            key = %event.key,
            stage = ?event.stage,
            "dataset refreshed"
        );
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEventSink {
    events: Mutex<Vec<RuntimeEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RuntimeEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: &RuntimeEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use market_sim::Instrument;

    use crate::{
        events::{EventSink, RefreshStage, RuntimeEvent},
        selection::CacheKey,
    };

    use super::{InMemoryEventSink, TracingSink};

    fn book_event(tick: u64) -> RuntimeEvent {
        RuntimeEvent::new(
            tick,
            CacheKey::Book {
                instrument: Instrument::UsdBtc,
            },
            RefreshStage::Advanced,
        )
    }

    #[test]
    fn in_memory_sink_keeps_publish_order() {
        let sink = InMemoryEventSink::new();
        sink.publish(&book_event(1));
        sink.publish(&book_event(2));

        let ticks: Vec<u64> = sink.events().iter().map(|event| event.tick).collect();
        assert_eq!(ticks, vec![1, 2]);
    }

    #[test]
    fn paired_sinks_both_receive_events() {
        let recorded = Arc::new(InMemoryEventSink::new());
        let fanout = (TracingSink, Arc::clone(&recorded));

        fanout.publish(&book_event(9));

        assert_eq!(recorded.events(), vec![book_event(9)]);
    }
}
