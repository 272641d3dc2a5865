use std::fmt;

use market_sim::{Instrument, TimeRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderTab {
    #[default]
    Open,
    Filled,
    Cancelled,
}

/// What the dashboard is looking at. Owned by the caller and handed to the
/// engine; nothing reads it from ambient state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub instrument: Instrument,
    pub range: TimeRange,
    pub tab: OrderTab,
}

impl Selection {
    pub fn new(instrument: Instrument, range: TimeRange) -> Self {
        Self {
            instrument,
            range,
            tab: OrderTab::default(),
        }
    }

    pub fn series_key(&self) -> SeriesKey {
        SeriesKey {
            range: self.range,
            instrument: self.instrument,
        }
    }
}

/// Partial update of a [`Selection`]; absent fields are left alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SelectionUpdate {
    pub instrument: Option<Instrument>,
    pub range: Option<TimeRange>,
    pub tab: Option<OrderTab>,
}

impl SelectionUpdate {
    pub fn apply(self, current: Selection) -> Selection {
        Selection {
            instrument: self.instrument.unwrap_or(current.instrument),
            range: self.range.unwrap_or(current.range),
            tab: self.tab.unwrap_or(current.tab),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Series,
    Book,
    Tape,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Self::Series, Self::Book, Self::Tape];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Series => "series",
            Self::Book => "book",
            Self::Tape => "tape",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SeriesKey {
    pub range: TimeRange,
    pub instrument: Instrument,
}

/// Cache key of one dataset. The series is keyed by range and instrument,
/// book and tape by instrument only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "dataset", rename_all = "snake_case")]
pub enum CacheKey {
    Series {
        range: TimeRange,
        instrument: Instrument,
    },
    Book {
        instrument: Instrument,
    },
    Tape {
        instrument: Instrument,
    },
}

impl CacheKey {
    pub fn derive(dataset: Dataset, selection: &Selection) -> Self {
        match dataset {
            Dataset::Series => Self::Series {
                range: selection.range,
                instrument: selection.instrument,
            },
            Dataset::Book => Self::Book {
                instrument: selection.instrument,
            },
            Dataset::Tape => Self::Tape {
                instrument: selection.instrument,
            },
        }
    }

    pub fn dataset(&self) -> Dataset {
        match self {
            Self::Series { .. } => Dataset::Series,
            Self::Book { .. } => Dataset::Book,
            Self::Tape { .. } => Dataset::Tape,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series { range, instrument } => write!(f, "series:{range}:{instrument}"),
            Self::Book { instrument } => write!(f, "book:{instrument}"),
            Self::Tape { instrument } => write!(f, "tape:{instrument}"),
        }
    }
}
