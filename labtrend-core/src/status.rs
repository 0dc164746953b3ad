//! Out-of-range flag for the latest measurement of a parameter.

use serde::{Deserialize, Serialize};

use crate::{date::SampleDate, range::ParsedRange, Measurement};

/// Side of the reference range a value falls on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Low,
    High,
    #[default]
    Normal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StatusFlag {
    pub out_of_range: bool,
    pub trend: Trend,
}

impl StatusFlag {
    pub fn normal() -> Self {
        Self::default()
    }

    /// Compare one value against a parsed range. The lower bound is checked first.
    pub fn of_value(value: f64, range: &ParsedRange) -> Self {
        let trend = match (range.min, range.max) {
            (Some(min), _) if value < min => Trend::Low,
            (_, Some(max)) if value > max => Trend::High,
            _ => Trend::Normal,
        };
        Self {
            out_of_range: trend != Trend::Normal,
            trend,
        }
    }
}

/// Chronologically latest measurement.
///
/// Measurements with an unreadable date only win when no date in the series is
/// readable; then the first one in source order is returned. Among equal days the
/// earliest in source order wins.
pub fn latest_measurement(measurements: &[Measurement]) -> Option<&Measurement> {
    let mut latest: Option<(SampleDate, &Measurement)> = None;

    for measurement in measurements {
        let date = measurement.sample_date();
        latest = match latest {
            None => Some((date, measurement)),
            Some((current, _)) if is_later(date, current) => Some((date, measurement)),
            keep => keep,
        };
    }

    latest.map(|(_, measurement)| measurement)
}

fn is_later(candidate: SampleDate, current: SampleDate) -> bool {
    match (candidate, current) {
        (SampleDate::Day(a), SampleDate::Day(b)) => a > b,
        (SampleDate::Day(_), SampleDate::Unknown) => true,
        _ => false,
    }
}

/// Flag a series by its latest measurement and that measurement's own range.
/// An empty series is normal.
pub fn classify_series(measurements: &[Measurement]) -> StatusFlag {
    let Some(latest) = latest_measurement(measurements) else {
        return StatusFlag::normal();
    };
    StatusFlag::of_value(latest.value, &latest.parsed_range())
}
