use std::{collections::HashMap, sync::Arc};

use market_sim::{
    generate_book, generate_series, generate_tape, update_book, update_series, update_tape, Clock,
    Instrument, ManualClock, OrderBook, RngSource, Series, SeriesPrice, SystemClock, Tape,
    TimeRange, UniformSource,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    events::{RefreshStage, RuntimeEvent},
    selection::{CacheKey, Dataset, OrderTab, Selection, SeriesKey},
};

const TEST_EPOCH_MS: i64 = 1_700_000_000_000;

/// Pull-based view of one dataset for the active selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryState<T> {
    pub data: Option<T>,
    /// True only while no value has been produced for the active key.
    pub is_loading: bool,
}

impl<T> QueryState<T> {
    fn from_cached(data: Option<T>) -> Self {
        Self {
            is_loading: data.is_none(),
            data,
        }
    }
}

/// Owns the three dataset caches and the selection they are keyed by.
///
/// Each refresh either generates the active key's value (miss) or advances
/// it by one tick (hit). Book and tape read the series cache for their
/// reference price but never write to it.
pub struct MarketEngine {
    rng: Box<dyn UniformSource + Send>,
    clock: Arc<dyn Clock + Send + Sync>,
    selection: Selection,
    series: HashMap<SeriesKey, Series>,
    books: HashMap<Instrument, OrderBook>,
    tapes: HashMap<Instrument, Tape>,
    tick: u64,
}

impl MarketEngine {
    pub fn new<R, C>(rng: R, clock: C, selection: Selection) -> Self
    where
        R: UniformSource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        Self {
            rng: Box::new(rng),
            clock: Arc::new(clock),
            selection,
            series: HashMap::new(),
            books: HashMap::new(),
            tapes: HashMap::new(),
            tick: 0,
        }
    }

    pub fn seeded(seed: u64, selection: Selection) -> Self {
        Self::new(RngSource::seeded(seed), SystemClock, selection)
    }

    pub fn from_entropy(selection: Selection) -> Self {
        Self::new(RngSource::from_entropy(), SystemClock, selection)
    }

    pub fn for_test_seed(seed: u64) -> Self {
        Self::new(
            RngSource::seeded(seed),
            ManualClock::new(TEST_EPOCH_MS),
            Selection::default(),
        )
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Switches the selection and drops every cached value whose key no
    /// longer matches it. Returns the datasets whose key changed.
    pub fn select(&mut self, selection: Selection) -> Vec<Dataset> {
        let previous = std::mem::replace(&mut self.selection, selection);
        let invalidated: Vec<Dataset> = Dataset::ALL
            .into_iter()
            .filter(|dataset| {
                CacheKey::derive(*dataset, &previous) != CacheKey::derive(*dataset, &selection)
            })
            .collect();

        let series_key = selection.series_key();
        self.series.retain(|key, _| *key == series_key);
        self.books.retain(|instrument, _| *instrument == selection.instrument);
        self.tapes.retain(|instrument, _| *instrument == selection.instrument);

        if previous != selection {
            info!(
                instrument = %selection.instrument,
                range = %selection.range,
                tab = ?selection.tab,
                invalidated = ?invalidated,
                "selection changed"
            );
        }
        invalidated
    }

    pub fn set_instrument(&mut self, instrument: Instrument) -> Vec<Dataset> {
        self.select(Selection {
            instrument,
            ..self.selection
        })
    }

    pub fn set_range(&mut self, range: TimeRange) -> Vec<Dataset> {
        self.select(Selection {
            range,
            ..self.selection
        })
    }

    pub fn set_tab(&mut self, tab: OrderTab) -> Vec<Dataset> {
        self.select(Selection { tab, ..self.selection })
    }

    /// Current price of the active series, or the instrument's base price
    /// while no series exists yet.
    pub fn reference_price(&self) -> f64 {
        SeriesPrice(self.series.get(&self.selection.series_key()))
            .current_price_or(self.selection.instrument.base_price())
    }

    /// True when `key` is still what the active selection resolves to.
    /// Results for any other key are stale and should be dropped.
    pub fn is_current(&self, key: &CacheKey) -> bool {
        *key == CacheKey::derive(key.dataset(), &self.selection)
    }

    pub fn refresh(&mut self, dataset: Dataset) -> RuntimeEvent {
        self.tick += 1;
        let stage = match dataset {
            Dataset::Series => self.refresh_series(),
            Dataset::Book => self.refresh_book(),
            Dataset::Tape => self.refresh_tape(),
        };

        let key = CacheKey::derive(dataset, &self.selection);
        let event = RuntimeEvent::new(self.tick, key, stage);
        debug!(tick = event.tick, key = %event.key, stage = ?event.stage, "refresh applied");
        event
    }

    /// Refreshes series first so book and tape anchor on the fresh price.
    pub fn step_once(&mut self) -> Vec<RuntimeEvent> {
        Dataset::ALL
            .into_iter()
            .map(|dataset| self.refresh(dataset))
            .collect()
    }

    fn refresh_series(&mut self) -> RefreshStage {
        let key = self.selection.series_key();
        let (next, stage) = match self.series.get(&key) {
            Some(previous) => (
                update_series(previous, key.instrument, &mut *self.rng, &*self.clock),
                RefreshStage::Advanced,
            ),
            None => (
                generate_series(key.range, key.instrument, &mut *self.rng, &*self.clock),
                RefreshStage::Created,
            ),
        };
        self.series.insert(key, next);
        stage
    }

    fn refresh_book(&mut self) -> RefreshStage {
        let reference = self.reference_price();
        let instrument = self.selection.instrument;
        let (next, stage) = match self.books.get(&instrument) {
            Some(previous) => (
                update_book(previous, reference, &mut *self.rng, &*self.clock),
                RefreshStage::Advanced,
            ),
            None => (
                generate_book(reference, &mut *self.rng, &*self.clock),
                RefreshStage::Created,
            ),
        };
        self.books.insert(instrument, next);
        stage
    }

    fn refresh_tape(&mut self) -> RefreshStage {
        let reference = self.reference_price();
        let instrument = self.selection.instrument;
        let (next, stage) = match self.tapes.get(&instrument) {
            Some(previous) => (
                update_tape(previous, reference, &mut *self.rng, &*self.clock),
                RefreshStage::Advanced,
            ),
            None => (
                generate_tape(reference, &mut *self.rng, &*self.clock),
                RefreshStage::Created,
            ),
        };
        self.tapes.insert(instrument, next);
        stage
    }

    pub fn series_query(&self) -> QueryState<Series> {
        QueryState::from_cached(self.series.get(&self.selection.series_key()).cloned())
    }

    pub fn book_query(&self) -> QueryState<OrderBook> {
        QueryState::from_cached(self.books.get(&self.selection.instrument).cloned())
    }

    pub fn tape_query(&self) -> QueryState<Tape> {
        QueryState::from_cached(self.tapes.get(&self.selection.instrument).cloned())
    }
}
