use serde::Serialize;

use crate::{
    clock::Clock,
    instrument::Instrument,
    random::UniformSource,
    shape::{shape_of, TimeRange},
};

/// Largest per-tick move of the live price, as a fraction of the base price.
pub const TICK_STEP_PCT: f64 = 0.005;
/// Lowest price the live walk may reach, as a fraction of the base price.
pub const PRICE_FLOOR_PCT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricePoint {
    pub price: f64,
    pub timestamp: i64,
}

/// Fixed-length price history with its derived header values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    prices: Vec<PricePoint>,
    high: f64,
    low: f64,
    current_price: f64,
    percentage_change: f64,
}

impl Series {
    /// Builds a series and derives `high`, `low`, `current_price` and
    /// `percentage_change` from the points. Returns `None` for no points.
    pub fn from_points(prices: Vec<PricePoint>) -> Option<Self> {
        let first = prices.first()?.price;
        let current_price = prices.last()?.price;
        let (low, high) = prices.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(low, high), point| (low.min(point.price), high.max(point.price)),
        );

        Some(Self {
            percentage_change: percentage_change(first, current_price),
            prices,
            high,
            low,
            current_price,
        })
    }

    pub fn prices(&self) -> &[PricePoint] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    pub fn percentage_change(&self) -> f64 {
        self.percentage_change
    }
}

/// Relative change of `last` against `first`, in percent. A zero or
/// non-finite `first` yields 0 instead of an undefined ratio.
pub fn percentage_change(first: f64, last: f64) -> f64 {
    if first == 0.0 || !first.is_finite() || !last.is_finite() {
        return 0.0;
    }
    (last - first) / first * 100.0
}

/// Fabricates the initial history for `range` and `instrument`. The last
/// point is one interval before `now`.
pub fn generate_series<R, C>(
    range: TimeRange,
    instrument: Instrument,
    rng: &mut R,
    clock: &C,
) -> Series
where
    R: UniformSource + ?Sized,
    C: Clock + ?Sized,
{
    let shape = shape_of(range);
    let base = instrument.base_price();
    let amplitude = shape.volatility * base;
    let period = shape.point_count as f64 / 6.0;
    let now = clock.now_ms();

    let prices = (0..shape.point_count)
        .map(|i| {
            let steps_back = (shape.point_count - i) as i64;
            let trend = (i as f64 / period).sin() * amplitude;
            let noise = rng.symmetric(amplitude);
            PricePoint {
                price: base + trend + noise,
                timestamp: now.saturating_sub(steps_back.saturating_mul(shape.interval_ms)),
            }
        })
        .collect();

    // point_count > 1 for every range, so the series is never empty.
    Series::from_points(prices).unwrap_or_else(|| single_point(base, now))
}

/// Advances `previous` by one tick: appends a point stamped `now`, drops the
/// oldest one, and widens `high`/`low` to cover the new price.
///
/// Bounds are never tightened when the point that set them slides out of
/// the window, so the chart axis stays stable between ticks.
pub fn update_series<R, C>(
    previous: &Series,
    instrument: Instrument,
    rng: &mut R,
    clock: &C,
) -> Series
where
    R: UniformSource + ?Sized,
    C: Clock + ?Sized,
{
    let base = instrument.base_price();
    let last_price = previous.current_price;
    let new_price =
        (last_price + rng.symmetric(TICK_STEP_PCT * base)).max(PRICE_FLOOR_PCT * base);
    let new_point = PricePoint {
        price: new_price,
        timestamp: clock.now_ms(),
    };

    let mut prices = Vec::with_capacity(previous.prices.len().max(1));
    prices.extend(previous.prices.iter().skip(1).copied());
    prices.push(new_point);

    let first = prices[0].price;
    Series {
        high: previous.high.max(new_price),
        low: previous.low.min(new_price),
        current_price: new_price,
        percentage_change: percentage_change(first, new_price),
        prices,
    }
}

fn single_point(price: f64, timestamp: i64) -> Series {
    Series {
        prices: vec![PricePoint { price, timestamp }],
        high: price,
        low: price,
        current_price: price,
        percentage_change: 0.0,
    }
}
