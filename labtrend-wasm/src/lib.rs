//! Framework-neutral WASM <-> JavaScript bridge.

use std::collections::BTreeMap;

use labtrend_core::{build_chart, ChartConfig, LabError, ParameterSeries, CLINICAL_EVENTS};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsChartConfig {
    #[serde(default)]
    begin_at_zero_below: Option<f64>,
    #[serde(default)]
    palette: Option<Vec<String>>,
    #[serde(default)]
    general_ref_ranges: Option<BTreeMap<String, String>>,
}

impl From<JsChartConfig> for ChartConfig {
    fn from(cfg: JsChartConfig) -> Self {
        let mut base = ChartConfig::default();
        if let Some(threshold) = cfg.begin_at_zero_below {
            base.begin_at_zero_below = threshold;
        }
        if let Some(palette) = cfg.palette.filter(|p| !p.is_empty()) {
            base.palette = palette;
        }
        if let Some(ranges) = cfg.general_ref_ranges {
            base.general_ref_ranges = ranges;
        }
        base
    }
}

/// Flag every parameter of a `{ parameter: Measurement[] }` dataset.
#[wasm_bindgen]
pub fn summarize_dataset(input_dataset: JsValue) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let dataset = read_dataset(input_dataset)?;
    let snapshot = labtrend_store::summarize_dataset_value(&dataset)
        .map_err(|err| JsValue::from_str(&format_lab_error(err)))?;

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize snapshot: {err}")))
}

/// Chart bundle for the named parameters, in the given order.
#[wasm_bindgen]
pub fn build_chart_bundle(
    input_dataset: JsValue,
    parameters: JsValue,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let parameters: Vec<String> = from_value(parameters)
        .map_err(|err| JsValue::from_str(&format!("Could not read parameter list: {err}")))?;
    let dataset = read_dataset(input_dataset)?;
    let data = labtrend_store::load_dataset_value(&dataset)
        .map_err(|err| JsValue::from_str(&format_lab_error(err)))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsChartConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            ChartConfig::from(cfg)
        }
        None => ChartConfig::default(),
    };

    let series = parameters
        .into_iter()
        .map(|name| match data.get(&name) {
            Some(measurements) => Ok(ParameterSeries::new(name, measurements.clone())),
            None => Err(LabError::UnknownParameter(name)),
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| JsValue::from_str(&format_lab_error(err)))?;

    let bundle = build_chart(&series, &CLINICAL_EVENTS, &cfg);

    to_value(&bundle)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize chart: {err}")))
}

fn read_dataset(input_dataset: JsValue) -> Result<serde_json::Value, JsValue> {
    from_value::<serde_json::Value>(input_dataset)
        .map_err(|err| JsValue::from_str(&format!("Could not read dataset JSON: {err}")))
}

fn format_lab_error(err: LabError) -> String {
    format!("Lab data error: {err}")
}
