//! Session state for the parameter selector and chart.
//!
//! Derived state (parameter list, flags) is recomputed explicitly by
//! [`Dashboard::refresh`] after every change to the dataset.

use std::collections::BTreeMap;

use labtrend_core::{
    build_chart, classify_series, BloodTestData, ChartBundle, ChartConfig, LabError, Measurement,
    ParameterSeries, StatusFlag, Trend, CLINICAL_EVENTS,
};
use serde::{Deserialize, Serialize};

use crate::{store::DataStore, summarize_dataset, DashboardSnapshot};

/// Selector entry: parameter name plus an arrow when out of range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectorOption {
    pub name: String,
    pub label: String,
}

/// `Glucosa ⬆️`, `Hierro ⬇️`, or the bare name when in range.
pub fn selector_label(name: &str, flag: StatusFlag) -> String {
    if !flag.out_of_range {
        return name.to_string();
    }
    match flag.trend {
        Trend::Low => format!("{name} ⬇️"),
        _ => format!("{name} ⬆️"),
    }
}

/// Raw input of the add-measurement form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewMeasurement {
    pub parameter: String,
    pub date: String,
    pub value: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub ref_range: String,
    #[serde(default)]
    pub note: String,
}

impl NewMeasurement {
    /// Parameter name and measurement. Parameter, date and value are required;
    /// an empty reference range or note is stored as absent.
    pub fn into_measurement(self) -> Result<(String, Measurement), LabError> {
        let parameter = self.parameter.trim();
        if parameter.is_empty() {
            return Err(LabError::MissingData("parameter"));
        }
        if self.date.trim().is_empty() {
            return Err(LabError::MissingData("date"));
        }
        let value = self.value.trim();
        if value.is_empty() {
            return Err(LabError::MissingData("value"));
        }
        let value = value
            .parse::<f64>()
            .map_err(|_| LabError::Parse(format!("Invalid value: {value}")))?;

        let measurement = Measurement {
            date: self.date.trim().to_string(),
            value,
            unit: self.unit,
            ref_range: Some(self.ref_range).filter(|s| !s.is_empty()),
            note: Some(self.note).filter(|s| !s.is_empty()),
        };
        Ok((parameter.to_string(), measurement))
    }
}

pub struct Dashboard<S> {
    store: S,
    data: BloodTestData,
    parameters: Vec<String>,
    flags: BTreeMap<String, StatusFlag>,
    selected: Vec<String>,
}

impl<S: DataStore> Dashboard<S> {
    /// Load the dataset and select the first parameter.
    pub fn open(store: S) -> Result<Self, LabError> {
        let data = store.load()?;
        let mut dashboard = Self {
            store,
            data,
            parameters: Vec::new(),
            flags: BTreeMap::new(),
            selected: Vec::new(),
        };
        dashboard.refresh();
        dashboard.selected = dashboard.parameters.iter().take(1).cloned().collect();
        Ok(dashboard)
    }

    /// Recompute the parameter list and flags from the current dataset.
    pub fn refresh(&mut self) {
        self.parameters = self
            .data
            .iter()
            .filter(|(_, measurements)| !measurements.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        self.flags = self
            .parameters
            .iter()
            .map(|name| (name.clone(), classify_series(&self.data[name])))
            .collect();
    }

    /// Parameters with at least one measurement, sorted by name.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn flag(&self, parameter: &str) -> StatusFlag {
        self.flags.get(parameter).copied().unwrap_or_default()
    }

    pub fn selector_options(&self) -> Vec<SelectorOption> {
        self.parameters
            .iter()
            .map(|name| SelectorOption {
                name: name.clone(),
                label: selector_label(name, self.flag(name)),
            })
            .collect()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn select(&mut self, parameters: Vec<String>) -> Result<(), LabError> {
        if let Some(unknown) = parameters.iter().find(|p| !self.data.contains_key(*p)) {
            return Err(LabError::UnknownParameter(unknown.clone()));
        }
        self.selected = parameters;
        Ok(())
    }

    /// Validate the form, append through the store and recompute derived state.
    pub fn add_measurement(&mut self, form: NewMeasurement) -> Result<(), LabError> {
        let (parameter, measurement) = form.into_measurement()?;
        self.store.append(&parameter, measurement)?;
        self.data = self.store.load()?;
        self.refresh();
        Ok(())
    }

    /// Chart of the selected parameters that have data.
    pub fn chart(&self, config: &ChartConfig) -> Option<ChartBundle> {
        let series: Vec<ParameterSeries> = self
            .selected
            .iter()
            .filter_map(|name| {
                let measurements = self.data.get(name)?;
                Some(ParameterSeries::new(name.clone(), measurements.clone()))
            })
            .collect();

        if series.is_empty() {
            return None;
        }
        Some(build_chart(&series, &CLINICAL_EVENTS, config))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        summarize_dataset(&self.data)
    }

    pub fn data(&self) -> &BloodTestData {
        &self.data
    }
}
