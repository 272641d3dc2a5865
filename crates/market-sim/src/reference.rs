use crate::series::Series;

/// Read-only view of the series cache used to anchor book and tape
/// generation. Never mutates the series it reads.
#[derive(Debug, Clone, Copy)]
pub struct SeriesPrice<'a>(pub Option<&'a Series>);

impl SeriesPrice<'_> {
    /// The series' current price, or `default` when there is no series or its
    /// price is not a usable positive number.
    pub fn current_price_or(&self, default: f64) -> f64 {
        self.0
            .map(Series::current_price)
            .filter(|price| price.is_finite() && *price > 0.0)
            .unwrap_or(default)
    }
}
