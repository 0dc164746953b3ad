//! Chart bundle assembly: datasets, threshold and event lines, legend and axes.
//!
//! The bundle is handed as-is to the chart renderer. Reference lines come from
//! the range of each parameter's *earliest* measurement, so a lab changing its
//! normal range later does not move the lines.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    date::SampleDate,
    events::{ClinicalEvent, EventLabelStyle},
    format,
    range::ParsedRange,
    series::normalize_series,
    ChartConfig, Measurement, ParameterSeries,
};

pub const MIN_LINE_COLOR: &str = "rgba(255, 99, 132, 0.7)";
pub const MAX_LINE_COLOR: &str = "rgba(75, 192, 192, 0.7)";
const FALLBACK_SERIES_COLOR: &str = "#4f46e5";
const LINE_WIDTH: u32 = 2;
const LINE_DASH: [u32; 2] = [6, 6];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    Min,
    Max,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: u32,
    pub dash: [u32; 2],
}

impl LineStyle {
    fn dashed(color: &str) -> Self {
        Self {
            color: color.to_string(),
            width: LINE_WIDTH,
            dash: LINE_DASH,
        }
    }
}

/// Label pinned to the end of a threshold line.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ThresholdLabel {
    pub content: String,
    pub position: &'static str,
    pub background_color: String,
    pub color: &'static str,
    pub font_size: u32,
    pub padding: u32,
    pub border_radius: u32,
}

/// Overlay drawn on top of the series.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// Reference bound across the value axis.
    Horizontal {
        parameter: String,
        threshold: Threshold,
        value: f64,
        style: LineStyle,
        label: ThresholdLabel,
    },
    /// Clinical event across the time axis.
    Vertical {
        event_id: String,
        date: NaiveDate,
        style: LineStyle,
        label: Option<EventLabelStyle>,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartPoint {
    pub date: SampleDate,
    pub value: f64,
    pub tooltip_title: String,
    pub tooltip_body: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartDataset {
    pub parameter: String,
    pub label: String,
    pub unit: String,
    pub color: String,
    /// Range the threshold lines were drawn from.
    pub reference: ParsedRange,
    pub points: Vec<ChartPoint>,
}

/// Event listed beside the chart instead of labelled on it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LegendEntry {
    pub date: NaiveDate,
    pub date_label: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AxisOptions {
    pub x_title: String,
    pub y_title: String,
    pub begin_at_zero: bool,
    pub tick_format: &'static str,
    pub tooltip_format: &'static str,
}

/// Everything the renderer needs for one chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartBundle {
    pub title: String,
    pub datasets: Vec<ChartDataset>,
    pub annotations: Vec<Annotation>,
    pub legend: Vec<LegendEntry>,
    pub axes: AxisOptions,
}

/// Build the chart for one parameter, or an overlay of several.
///
/// Series are sorted here, so callers may pass them in source order. With more
/// than one series each parameter takes `palette[index % len]` and its
/// threshold lines use that colour.
pub fn build_chart(
    series: &[ParameterSeries],
    events: &[ClinicalEvent],
    config: &ChartConfig,
) -> ChartBundle {
    let overlay = series.len() > 1;
    let mut datasets = Vec::with_capacity(series.len());
    let mut annotations = Vec::new();

    for (index, parameter) in series.iter().enumerate() {
        let sorted = normalize_series(&parameter.measurements);
        let reference = representative_range(&sorted);
        let unit = sorted
            .first()
            .map(|measurement| measurement.unit.clone())
            .unwrap_or_default();
        let color = series_color(&config.palette, index);

        annotations.extend(threshold_annotations(
            &parameter.name,
            &reference,
            overlay.then_some(color.as_str()),
        ));

        let points = sorted
            .iter()
            .map(|measurement| {
                let date = measurement.sample_date();
                ChartPoint {
                    date,
                    value: measurement.value,
                    tooltip_title: format::tooltip_title(date),
                    tooltip_body: format::tooltip_body(&parameter.name, &unit, measurement),
                }
            })
            .collect();

        datasets.push(ChartDataset {
            parameter: parameter.name.clone(),
            label: format!("{} ({unit})", parameter.name),
            unit,
            color,
            reference,
            points,
        });
    }

    annotations.extend(event_annotations(events));

    let begin_at_zero = begin_at_zero(
        datasets
            .iter()
            .flat_map(|dataset| dataset.points.iter().map(|point| point.value)),
        config.begin_at_zero_below,
    );

    let (title, y_title) = match datasets.as_slice() {
        [single] => {
            let ref_text = config
                .general_ref_ranges
                .get(&single.parameter)
                .cloned()
                .unwrap_or_else(|| format!("Ref: {}", single.reference.text));
            (
                format!("{} - Evolución ({ref_text})", single.parameter),
                format!("Valor ({})", single.unit),
            )
        }
        [] => ("Evolución".to_string(), "Valor".to_string()),
        many => {
            let names: Vec<&str> = many.iter().map(|d| d.parameter.as_str()).collect();
            let title = format!("{} - Evolución", names.join(", "));
            (title, "Valor".to_string())
        }
    };

    tracing::debug!(
        datasets = datasets.len(),
        annotations = annotations.len(),
        begin_at_zero,
        "chart assembled"
    );

    ChartBundle {
        title,
        datasets,
        annotations,
        legend: event_legend(events),
        axes: AxisOptions {
            x_title: "Fecha del Análisis".to_string(),
            y_title,
            begin_at_zero,
            tick_format: "dd/MM/yy",
            tooltip_format: "dd/MM/yyyy",
        },
    }
}

/// Range of the earliest measurement of an already sorted series.
pub fn representative_range(sorted: &[Measurement]) -> ParsedRange {
    sorted
        .first()
        .map(Measurement::parsed_range)
        .unwrap_or_else(ParsedRange::unavailable)
}

/// Min and max reference lines. Without an overlay colour the min line is red
/// and the max line green, and labels omit the parameter name.
pub fn threshold_annotations(
    parameter: &str,
    range: &ParsedRange,
    overlay_color: Option<&str>,
) -> Vec<Annotation> {
    [
        (Threshold::Min, range.min, "Ref Min", MIN_LINE_COLOR),
        (Threshold::Max, range.max, "Ref Max", MAX_LINE_COLOR),
    ]
    .into_iter()
    .filter_map(|(threshold, value, caption, default_color)| {
        let value = value?;
        let color = overlay_color.unwrap_or(default_color);
        let content = match overlay_color {
            Some(_) => format!("{parameter} {caption}: {value}"),
            None => format!("{caption}: {value}"),
        };
        Some(Annotation::Horizontal {
            parameter: parameter.to_string(),
            threshold,
            value,
            style: LineStyle::dashed(color),
            label: ThresholdLabel {
                content,
                position: "end",
                background_color: color.to_string(),
                color: "white",
                font_size: 10,
                padding: 3,
                border_radius: 3,
            },
        })
    })
    .collect()
}

/// One vertical line per event; only events shown on the chart keep a label.
pub fn event_annotations(events: &[ClinicalEvent]) -> Vec<Annotation> {
    events
        .iter()
        .filter_map(|event| {
            let Some(date) = event.day().day() else {
                tracing::warn!(event = event.id, "clinical event has an unreadable date");
                return None;
            };
            Some(Annotation::Vertical {
                event_id: event.id.to_string(),
                date,
                style: LineStyle::dashed(event.line_color),
                label: event.label.filter(|_| event.display_on_chart),
            })
        })
        .collect()
}

pub fn event_legend(events: &[ClinicalEvent]) -> Vec<LegendEntry> {
    events
        .iter()
        .filter(|event| event.is_legend_entry())
        .filter_map(|event| {
            let date = event.day().day()?;
            Some(LegendEntry {
                date,
                date_label: format::day_short_month(date),
                description: event.description.to_string(),
                color: event.legend_color.unwrap_or(event.line_color).to_string(),
            })
        })
        .collect()
}

/// Start the value axis at zero when no value is negative and the smallest is
/// below `threshold`. No values means auto-scale.
pub fn begin_at_zero(values: impl IntoIterator<Item = f64>, threshold: f64) -> bool {
    let mut smallest = f64::INFINITY;
    for value in values {
        if value.is_nan() || value < 0.0 {
            return false;
        }
        smallest = smallest.min(value);
    }
    smallest < threshold
}

fn series_color(palette: &[String], index: usize) -> String {
    if palette.is_empty() {
        return FALLBACK_SERIES_COLOR.to_string();
    }
    palette[index % palette.len()].clone()
}
