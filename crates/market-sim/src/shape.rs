use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HOUR_MS: i64 = 60 * 60 * 1_000;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const MONTH_MS: i64 = 30 * DAY_MS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "MAX")]
    Max,
}

/// How a time range is rendered as a fabricated history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeParams {
    pub point_count: usize,
    pub interval_ms: i64,
    pub volatility: f64,
}

impl TimeRange {
    pub const ALL: [TimeRange; 6] = [
        Self::SevenDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::OneYear,
        Self::FiveYears,
        Self::Max,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SevenDays => "7D",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::OneYear => "1Y",
            Self::FiveYears => "5Y",
            Self::Max => "MAX",
        }
    }

    pub fn shape(self) -> ShapeParams {
        shape_of(self)
    }
}

/// 7D is hourly for a week, 1M/3M/1Y are daily, 5Y and MAX are monthly.
pub fn shape_of(range: TimeRange) -> ShapeParams {
    let (point_count, interval_ms, volatility) = match range {
        TimeRange::SevenDays => (168, HOUR_MS, 0.01),
        TimeRange::OneMonth => (30, DAY_MS, 0.02),
        TimeRange::ThreeMonths => (90, DAY_MS, 0.03),
        TimeRange::OneYear => (365, DAY_MS, 0.05),
        TimeRange::FiveYears => (60, MONTH_MS, 0.08),
        TimeRange::Max => (120, MONTH_MS, 0.10),
    };

    ShapeParams {
        point_count,
        interval_ms,
        volatility,
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time range `{0}`, expected one of: 7D, 1M, 3M, 1Y, 5Y, MAX")]
pub struct ParseTimeRangeError(pub String);

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseTimeRangeError(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::{shape_of, ShapeParams, TimeRange, DAY_MS, HOUR_MS, MONTH_MS};

    #[test]
    fn seven_days_is_hourly_for_a_week() {
        assert_eq!(
            shape_of(TimeRange::SevenDays),
            ShapeParams {
                point_count: 168,
                interval_ms: 3_600_000,
                volatility: 0.01,
            }
        );
    }

    #[test]
    fn reference_table_is_preserved() {
        let table: Vec<(usize, i64, f64)> = TimeRange::ALL
            .into_iter()
            .map(|range| {
                let shape = shape_of(range);
                (shape.point_count, shape.interval_ms, shape.volatility)
            })
            .collect();

        assert_eq!(
            table,
            vec![
                (168, HOUR_MS, 0.01),
                (30, DAY_MS, 0.02),
                (90, DAY_MS, 0.03),
                (365, DAY_MS, 0.05),
                (60, MONTH_MS, 0.08),
                (120, MONTH_MS, 0.10),
            ]
        );
    }

    #[test]
    fn shape_is_pure_and_well_formed() {
        for range in TimeRange::ALL {
            let first = shape_of(range);
            assert_eq!(first, shape_of(range));
            assert_eq!(first, range.shape());
            assert!(first.point_count > 1);
            assert!(first.interval_ms > 0);
            assert!(first.volatility > 0.0);
        }
    }

    #[test]
    fn parses_wire_names() {
        for range in TimeRange::ALL {
            assert_eq!(range.as_str().parse::<TimeRange>(), Ok(range));
        }
        assert_eq!("max".parse::<TimeRange>(), Ok(TimeRange::Max));
        assert!("2W".parse::<TimeRange>().is_err());
    }
}
