//! Blood-test JSON dataset to dashboard summaries, plus the session state that
//! sits between a data store and the chart.

use chrono::{DateTime, Utc};
use labtrend_core::{
    classify_series, latest_measurement, BloodTestData, LabError, Measurement, SampleDate,
    StatusFlag,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod dashboard;
pub mod descriptions;
pub mod store;

pub use dashboard::{selector_label, Dashboard, NewMeasurement, SelectorOption};
pub use descriptions::{
    description_prompt, normalize_response, DescriptionCache, DescriptionProvider,
    DisabledDescriptions, GeneratedDescriptions, TextGenerator,
};
pub use store::{DataStore, InMemoryStore};

/// Latest state of one parameter, as shown in the selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterSummary {
    pub name: String,
    pub measurement_count: usize,
    pub latest_date: SampleDate,
    pub latest_value: f64,
    pub unit: String,
    pub flag: StatusFlag,
    pub selector_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub parameters: Vec<ParameterSummary>,
}

impl DashboardSnapshot {
    pub fn out_of_range(&self) -> impl Iterator<Item = &ParameterSummary> {
        self.parameters.iter().filter(|p| p.flag.out_of_range)
    }
}

/// Read a dataset from a JSON string.
pub fn load_dataset_str(json: &str) -> Result<BloodTestData, LabError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| LabError::Parse(err.to_string()))?;
    load_dataset_value(&value)
}

/// Read a dataset shaped `{ "<parameter>": [ { "date", "value", "unit", "refRange", "note" } ] }`.
pub fn load_dataset_value(dataset: &Value) -> Result<BloodTestData, LabError> {
    let parameters = dataset
        .as_object()
        .ok_or(LabError::MissingData("parameter map"))?;

    let mut data = BloodTestData::new();
    for (name, entries) in parameters {
        let entries = entries.as_array().ok_or_else(|| {
            LabError::Parse(format!("Expected a list of measurements for {name}"))
        })?;

        let measurements = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Measurement::deserialize(entry)
                    .map_err(|err| LabError::Parse(format!("{name}[{index}]: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        data.insert(name.clone(), measurements);
    }

    tracing::info!(parameters = data.len(), "dataset loaded");
    Ok(data)
}

/// Summarize a dataset from a JSON string.
pub fn summarize_dataset_str(json: &str) -> Result<DashboardSnapshot, LabError> {
    let data = load_dataset_str(json)?;
    Ok(summarize_dataset(&data))
}

/// Summarize a dataset from a `serde_json::Value`.
pub fn summarize_dataset_value(dataset: &Value) -> Result<DashboardSnapshot, LabError> {
    let data = load_dataset_value(dataset)?;
    Ok(summarize_dataset(&data))
}

/// Flag every parameter that has at least one measurement, in name order.
pub fn summarize_dataset(data: &BloodTestData) -> DashboardSnapshot {
    let parameters = data
        .iter()
        .filter_map(|(name, measurements)| summarize_parameter(name, measurements))
        .collect();

    DashboardSnapshot {
        generated_at: Utc::now(),
        parameters,
    }
}

fn summarize_parameter(name: &str, measurements: &[Measurement]) -> Option<ParameterSummary> {
    let latest = latest_measurement(measurements)?;
    let flag = classify_series(measurements);

    Some(ParameterSummary {
        name: name.to_string(),
        measurement_count: measurements.len(),
        latest_date: latest.sample_date(),
        latest_value: latest.value,
        unit: latest.unit.clone(),
        flag,
        selector_label: selector_label(name, flag),
    })
}
