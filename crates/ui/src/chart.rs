use serde::Serialize;

/// Horizontal grid lines drawn across the chart, including both edges.
pub const GRID_DIVISIONS: usize = 6;
/// Extra vertical room around the price range, as a fraction of it.
pub const RANGE_PADDING: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub y: f64,
    pub price: f64,
}

/// Screen-space layout of a price line. `y` grows downwards, so the
/// highest price sits at the top.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartLayout {
    pub points: Vec<ChartPoint>,
    pub grid_lines: Vec<GridLine>,
    pub min_price: f64,
    pub max_price: f64,
    pub price_range: f64,
}

impl ChartLayout {
    pub fn compute(prices: &[f64], width: f64, height: f64) -> Self {
        if prices.is_empty() {
            return Self::default();
        }

        let (low, high) = prices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), price| {
                (low.min(*price), high.max(*price))
            });
        let raw_range = high - low;
        // A flat line would otherwise divide by zero.
        let raw_range = if raw_range > 0.0 { raw_range } else { 1.0 };

        let padded_range = raw_range * (1.0 + RANGE_PADDING);
        let margin = (padded_range - raw_range) / 2.0;
        let min_price = low - margin;
        let max_price = high + margin;

        let x_scale = width / (prices.len().saturating_sub(1).max(1)) as f64;
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, price)| ChartPoint {
                x: i as f64 * x_scale,
                y: (max_price - price) / padded_range * height,
                price: *price,
            })
            .collect();

        let grid_lines = (0..=GRID_DIVISIONS)
            .map(|i| {
                let fraction = i as f64 / GRID_DIVISIONS as f64;
                GridLine {
                    y: fraction * height,
                    price: max_price - padded_range * fraction,
                }
            })
            .collect();

        Self {
            points,
            grid_lines,
            min_price,
            max_price,
            price_range: padded_range,
        }
    }

    /// SVG path through every point, `M x y L x y ...`.
    pub fn svg_path(&self) -> String {
        let mut path = String::new();
        for (i, point) in self.points.iter().enumerate() {
            let command = if i == 0 { "M" } else { " L" };
            path.push_str(&format!("{command} {:.2} {:.2}", point.x, point.y));
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartLayout, GRID_DIVISIONS};

    #[test]
    fn empty_series_has_empty_layout() {
        let layout = ChartLayout::compute(&[], 300.0, 200.0);

        assert!(layout.points.is_empty());
        assert!(layout.grid_lines.is_empty());
        assert_eq!(layout.price_range, 0.0);
        assert_eq!(layout.svg_path(), "");
    }

    #[test]
    fn prices_are_padded_and_flipped() {
        let layout = ChartLayout::compute(&[100.0, 110.0, 105.0], 200.0, 110.0);

        assert!((layout.price_range - 11.0).abs() < 1e-9);
        assert!((layout.min_price - 99.5).abs() < 1e-9);
        assert!((layout.max_price - 110.5).abs() < 1e-9);
        assert_eq!(layout.points[0].x, 0.0);
        assert_eq!(layout.points[2].x, 200.0);
        assert!((layout.points[1].y - 5.0).abs() < 1e-9);
        assert!((layout.points[0].y - 105.0).abs() < 1e-9);
    }

    #[test]
    fn flat_series_uses_unit_range() {
        let layout = ChartLayout::compute(&[42.0, 42.0], 100.0, 100.0);

        assert!((layout.price_range - 1.1).abs() < 1e-9);
        assert!(layout.points.iter().all(|point| point.y.is_finite()));
    }

    #[test]
    fn single_point_does_not_divide_by_zero() {
        let layout = ChartLayout::compute(&[7.0], 100.0, 50.0);

        assert_eq!(layout.points.len(), 1);
        assert_eq!(layout.points[0].x, 0.0);
        assert!(layout.svg_path().starts_with("M 0.00"));
    }

    #[test]
    fn grid_runs_from_max_at_top_to_min_at_bottom() {
        let layout = ChartLayout::compute(&[10.0, 20.0], 100.0, 60.0);

        assert_eq!(layout.grid_lines.len(), GRID_DIVISIONS + 1);
        assert_eq!(layout.grid_lines[0].y, 0.0);
        assert!((layout.grid_lines[0].price - layout.max_price).abs() < 1e-9);
        assert!((layout.grid_lines[GRID_DIVISIONS].price - layout.min_price).abs() < 1e-9);
        assert!((layout.grid_lines[GRID_DIVISIONS].y - 60.0).abs() < 1e-9);
    }
}
