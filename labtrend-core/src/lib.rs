//! Core logic for blood-test trend charts: parsing, flagging and chart assembly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod annotation;
pub mod date;
pub mod events;
pub mod format;
pub mod range;
pub mod series;
pub mod status;

pub use annotation::{
    build_chart, Annotation, AxisOptions, ChartBundle, ChartDataset, ChartPoint, LegendEntry,
    Threshold,
};
pub use date::{parse_sample_date, SampleDate};
pub use events::{ClinicalEvent, EventLabelStyle, CLINICAL_EVENTS};
pub use range::{parse_ref_range, ParsedRange};
pub use series::normalize_series;
pub use status::{classify_series, latest_measurement, StatusFlag, Trend};

/// Display settings for chart assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// The value axis starts at zero only when the smallest value is below this.
    pub begin_at_zero_below: f64,
    /// Series colours for multi-parameter charts, reused cyclically.
    pub palette: Vec<String>,
    /// Reference text shown in the chart title instead of the parsed range.
    pub general_ref_ranges: BTreeMap<String, String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            begin_at_zero_below: 20.0,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            general_ref_ranges: BTreeMap::new(),
        }
    }
}

const DEFAULT_PALETTE: [&str; 8] = [
    "#4f46e5", "#db2777", "#059669", "#d97706", "#2563eb", "#7c3aed", "#dc2626", "#0891b2",
];

/// One dated lab result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub date: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub ref_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Measurement {
    /// Calendar day of the sample, or unknown when the date text is unparsable.
    pub fn sample_date(&self) -> SampleDate {
        parse_sample_date(&self.date)
    }

    pub fn parsed_range(&self) -> ParsedRange {
        parse_ref_range(self.ref_range.as_deref())
    }
}

/// Measurements of a single named parameter, in source order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ParameterSeries {
    pub name: String,
    pub measurements: Vec<Measurement>,
}

impl ParameterSeries {
    pub fn new(name: impl Into<String>, measurements: Vec<Measurement>) -> Self {
        Self {
            name: name.into(),
            measurements,
        }
    }
}

/// Whole dataset as persisted: parameter name to its measurements.
pub type BloodTestData = BTreeMap<String, Vec<Measurement>>;

/// Errors raised outside the pure parsing functions.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error("Missing required field: {0}")]
    MissingData(&'static str),
    #[error("Could not read data: {0}")]
    Parse(String),
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("Description unavailable: {0}")]
    Description(String),
}
