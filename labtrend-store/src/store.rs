//! Append-only access to the measurement dataset.

use labtrend_core::{BloodTestData, LabError, Measurement};

use crate::load_dataset_str;

/// Source of the dataset. Measurements are only ever appended.
pub trait DataStore {
    /// Full mapping of parameter name to measurements.
    fn load(&self) -> Result<BloodTestData, LabError>;

    fn append(&mut self, parameter: &str, measurement: Measurement) -> Result<(), LabError>;
}

/// Dataset held in memory for the life of the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryStore {
    data: BloodTestData,
}

impl InMemoryStore {
    pub fn new(data: BloodTestData) -> Self {
        Self { data }
    }

    pub fn from_json_str(json: &str) -> Result<Self, LabError> {
        load_dataset_str(json).map(Self::new)
    }

    /// Current dataset in the persisted JSON shape.
    pub fn to_json_string(&self) -> Result<String, LabError> {
        serde_json::to_string_pretty(&self.data).map_err(|err| LabError::Parse(err.to_string()))
    }
}

impl DataStore for InMemoryStore {
    fn load(&self) -> Result<BloodTestData, LabError> {
        Ok(self.data.clone())
    }

    fn append(&mut self, parameter: &str, measurement: Measurement) -> Result<(), LabError> {
        tracing::info!(parameter, date = %measurement.date, "measurement appended");
        self.data
            .entry(parameter.to_string())
            .or_default()
            .push(measurement);
        Ok(())
    }
}
