use serde::{Deserialize, Serialize};

use crate::{clock::Clock, random::UniformSource, series::PRICE_FLOOR_PCT};

/// Orders per side.
pub const BOOK_DEPTH: usize = 10;
/// Distance between generated levels, as a fraction of the reference price.
pub const LEVEL_STEP_PCT: f64 = 0.01;
/// Largest drift applied to a perturbed level, as a fraction of the reference price.
pub const LEVEL_DRIFT_PCT: f64 = 0.005;

const MIN_AMOUNT: f64 = 0.001;
const AMOUNT_SPAN: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    pub price: f64,
    pub amount: f64,
    pub side: Side,
    pub timestamp: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct OrderBook {
    buys: Vec<Order>,
    sells: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts buys best-bid first and sells best-ask first.
    pub fn from_sides(mut buys: Vec<Order>, mut sells: Vec<Order>) -> Self {
        sort_side(&mut buys, Side::Buy);
        sort_side(&mut sells, Side::Sell);

        Self { buys, sells }
    }

    pub fn buys(&self) -> &[Order] {
        &self.buys
    }

    pub fn sells(&self) -> &[Order] {
        &self.sells
    }

    pub fn best_bid(&self) -> Option<&Order> {
        self.buys.first()
    }

    pub fn best_ask(&self) -> Option<&Order> {
        self.sells.first()
    }

    pub fn spread(&self) -> Option<f64> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}

fn sort_side(orders: &mut [Order], side: Side) {
    match side {
        Side::Buy => orders.sort_by(|left, right| right.price.total_cmp(&left.price)),
        Side::Sell => orders.sort_by(|left, right| left.price.total_cmp(&right.price)),
    }
}

pub(crate) fn draw_amount<R: UniformSource + ?Sized>(rng: &mut R) -> f64 {
    MIN_AMOUNT + rng.uniform(0.0, AMOUNT_SPAN)
}

/// Builds `BOOK_DEPTH` levels per side, linearly spaced 1% apart around
/// `reference`.
pub fn generate_book<R, C>(reference: f64, rng: &mut R, clock: &C) -> OrderBook
where
    R: UniformSource + ?Sized,
    C: Clock + ?Sized,
{
    let now = clock.now_ms();
    let level = |side: Side, k: usize, rng: &mut R| {
        let offset = k as f64 * LEVEL_STEP_PCT * reference;
        let (prefix, price) = match side {
            Side::Buy => ("buy", reference - offset),
            Side::Sell => ("sell", reference + offset),
        };
        Order {
            id: format!("{prefix}-{}", k - 1),
            price,
            amount: draw_amount(rng),
            side,
            timestamp: now - (k as i64 - 1) * 1_000,
        }
    };

    let buys = (1..=BOOK_DEPTH).map(|k| level(Side::Buy, k, rng)).collect();
    let sells = (1..=BOOK_DEPTH).map(|k| level(Side::Sell, k, rng)).collect();

    OrderBook::from_sides(buys, sells)
}

/// Pushes one random bid down and one random ask up by up to 0.5% of
/// `reference`, redraws their amounts, and re-sorts both sides.
///
/// Bids never drop below 1% of `reference`.
pub fn update_book<R, C>(previous: &OrderBook, reference: f64, rng: &mut R, clock: &C) -> OrderBook
where
    R: UniformSource + ?Sized,
    C: Clock + ?Sized,
{
    let now = clock.now_ms();
    let mut buys = previous.buys.clone();
    let mut sells = previous.sells.clone();

    if !buys.is_empty() {
        let index = rng.index(buys.len());
        let order = &mut buys[index];
        let drifted = order.price - rng.uniform(0.0, LEVEL_DRIFT_PCT * reference);
        order.price = drifted.max(PRICE_FLOOR_PCT * reference);
        order.amount = draw_amount(rng);
        order.timestamp = now;
    }

    if !sells.is_empty() {
        let index = rng.index(sells.len());
        let order = &mut sells[index];
        order.price += rng.uniform(0.0, LEVEL_DRIFT_PCT * reference);
        order.amount = draw_amount(rng);
        order.timestamp = now;
    }

    // A single move can jump past several neighbours, so a local swap is not enough.
    OrderBook::from_sides(buys, sells)
}
