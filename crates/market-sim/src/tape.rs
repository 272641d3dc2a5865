use serde::Serialize;

use crate::{
    clock::Clock,
    orderbook::{draw_amount, Side},
    random::UniformSource,
};

/// Trades kept on the tape.
pub const TAPE_LEN: usize = 10;
/// Trades print within this fraction of the reference price.
pub const TRADE_BAND_PCT: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub id: String,
    pub price: f64,
    pub amount: f64,
    pub side: Side,
    pub timestamp: i64,
}

/// Bounded trade history, newest first.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Tape {
    trades: Vec<Trade>,
}

impl Tape {
    pub fn from_trades(trades: Vec<Trade>) -> Self {
        Self { trades }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn newest(&self) -> Option<&Trade> {
        self.trades.first()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

fn draw_trade<R: UniformSource + ?Sized>(reference: f64, rng: &mut R) -> (f64, f64, Side) {
    let price = reference + rng.symmetric(TRADE_BAND_PCT * reference);
    let amount = draw_amount(rng);
    let side = if rng.coin() { Side::Buy } else { Side::Sell };
    (price, amount, side)
}

/// `TAPE_LEN` trades around `reference`, one second apart going back from now.
pub fn generate_tape<R, C>(reference: f64, rng: &mut R, clock: &C) -> Tape
where
    R: UniformSource + ?Sized,
    C: Clock + ?Sized,
{
    let now = clock.now_ms();
    let trades = (0..TAPE_LEN)
        .map(|k| {
            let (price, amount, side) = draw_trade(reference, rng);
            Trade {
                id: format!("trade-{k}"),
                price,
                amount,
                side,
                timestamp: now - k as i64 * 1_000,
            }
        })
        .collect();

    Tape { trades }
}

/// Prints one new trade at the head and drops the oldest, keeping the length.
pub fn update_tape<R, C>(previous: &Tape, reference: f64, rng: &mut R, clock: &C) -> Tape
where
    R: UniformSource + ?Sized,
    C: Clock + ?Sized,
{
    let len = previous.trades.len();
    if len == 0 {
        return Tape::default();
    }

    let timestamp = previous
        .newest()
        .map_or(clock.now_ms(), |head| clock.now_ms().max(head.timestamp));
    let (price, amount, side) = draw_trade(reference, rng);
    let trade = Trade {
        id: unique_id(previous, timestamp),
        price,
        amount,
        side,
        timestamp,
    };

    let mut trades = Vec::with_capacity(len);
    trades.push(trade);
    trades.extend(previous.trades.iter().take(len - 1).cloned());

    Tape { trades }
}

fn unique_id(tape: &Tape, timestamp: i64) -> String {
    let base = format!("trade-{timestamp}");
    let taken = |id: &str| tape.trades.iter().any(|trade| trade.id == id);
    if !taken(&base) {
        return base;
    }

    let mut suffix = 1;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{
        clock::ManualClock,
        orderbook::Side,
        random::{RngSource, ScriptedSource},
    };

    use super::{generate_tape, update_tape, Tape, TAPE_LEN};

    #[test]
    fn generated_tape_is_newest_first_within_band() {
        let clock = ManualClock::new(50_000);
        let tape = generate_tape(200.0, &mut RngSource::seeded(8), &clock);

        assert_eq!(tape.len(), TAPE_LEN);
        assert_eq!(tape.newest().unwrap().timestamp, 50_000);
        assert!(tape.trades().windows(2).all(|pair| pair[0].timestamp > pair[1].timestamp));
        for trade in tape.trades() {
            assert!((198.0..202.0).contains(&trade.price));
            assert!((0.001..0.011).contains(&trade.amount));
        }
    }

    #[test]
    fn update_prepends_and_truncates() {
        let clock = ManualClock::new(0);
        let mut rng = RngSource::seeded(12);
        let tape = generate_tape(66_000.0, &mut rng, &clock);
        clock.set(5_000);

        let next = update_tape(&tape, 66_000.0, &mut rng, &clock);

        assert_eq!(next.len(), tape.len());
        assert_eq!(next.newest().unwrap().timestamp, 5_000);
        assert_eq!(&next.trades()[1..], &tape.trades()[..TAPE_LEN - 1]);
        let newest = next.newest().unwrap().price;
        assert!((66_000.0 * 0.99..=66_000.0 * 1.01).contains(&newest));
    }

    #[test]
    fn newest_timestamp_dominates_after_many_updates() {
        let clock = ManualClock::new(1_000_000);
        let mut rng = RngSource::seeded(21);
        let mut tape = generate_tape(0.052, &mut rng, &clock);

        for step in 0..50 {
            // Stall and rewind the clock now and then.
            if step % 7 == 0 {
                clock.advance(-3_000);
            } else if step % 3 != 0 {
                clock.advance(5_000);
            }
            tape = update_tape(&tape, 0.052, &mut rng, &clock);

            let head = tape.newest().unwrap().timestamp;
            assert_eq!(tape.len(), TAPE_LEN);
            assert!(tape.trades().iter().all(|trade| trade.timestamp <= head));
            let ids: HashSet<&str> = tape.trades().iter().map(|trade| trade.id.as_str()).collect();
            assert_eq!(ids.len(), TAPE_LEN);
            assert!(tape.trades().iter().all(|trade| trade.price > 0.0));
        }
    }

    #[test]
    fn scripted_draws_pick_price_and_side() {
        let clock = ManualClock::new(7);
        let tape = Tape::from_trades(Vec::new());
        assert!(update_tape(&tape, 100.0, &mut ScriptedSource::constant(0.5), &clock).is_empty());

        let tape = generate_tape(100.0, &mut ScriptedSource::constant(0.5), &clock);
        clock.set(70);
        let head = update_tape(&tape, 100.0, &mut ScriptedSource::new(vec![0.0, 0.0, 0.9]), &clock);
        let trade = head.newest().unwrap();

        assert_eq!(trade.price, 99.0);
        assert_eq!(trade.amount, 0.001);
        assert_eq!(trade.side, Side::Sell);
        assert_eq!(trade.id, "trade-70");
        assert_eq!(trade.timestamp, 70);
    }
}
