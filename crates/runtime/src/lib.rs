pub mod engine;
pub mod events;
pub mod logging;
pub mod scheduler;
pub mod selection;

pub use engine::{MarketEngine, QueryState};
pub use events::{EventSink, RefreshStage, RuntimeEvent};
pub use logging::{InMemoryEventSink, TracingSink};
pub use scheduler::{
    lock_engine, shared, spawn_refreshers, SharedEngine, DEFAULT_REFRESH_INTERVAL,
};
pub use selection::{CacheKey, Dataset, OrderTab, Selection, SelectionUpdate, SeriesKey};
