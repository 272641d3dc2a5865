mod clock;
mod instrument;
mod orderbook;
mod random;
mod reference;
mod series;
mod shape;
mod tape;

pub use clock::{Clock, ManualClock, SystemClock};
pub use instrument::{catalog, CatalogEntry, Instrument, ParseInstrumentError};
pub use orderbook::{
    generate_book, update_book, Order, OrderBook, Side, BOOK_DEPTH, LEVEL_DRIFT_PCT,
    LEVEL_STEP_PCT,
};
pub use random::{RngSource, ScriptedSource, UniformSource};
pub use reference::SeriesPrice;
pub use series::{
    generate_series, percentage_change, update_series, PricePoint, Series, PRICE_FLOOR_PCT,
    TICK_STEP_PCT,
};
pub use shape::{shape_of, ParseTimeRangeError, ShapeParams, TimeRange, DAY_MS, HOUR_MS, MONTH_MS};
pub use tape::{generate_tape, update_tape, Tape, Trade, TAPE_LEN, TRADE_BAND_PCT};
