//! Fixed clinical events drawn on every chart.

use serde::Serialize;

use crate::date::{parse_sample_date, SampleDate};

/// Styling of a label drawn next to an event line.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct EventLabelStyle {
    pub content: &'static str,
    pub position: &'static str,
    pub rotation: i32,
    pub background_color: &'static str,
    pub color: &'static str,
    pub font_size: u32,
    pub font_weight: &'static str,
    /// Top, bottom, left, right.
    pub padding: [u32; 4],
    pub border_radius: u32,
}

/// Dated treatment milestone shown as a vertical line.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ClinicalEvent {
    pub id: &'static str,
    /// `YYYY-MM-DD`.
    pub date: &'static str,
    pub description: &'static str,
    pub line_color: &'static str,
    /// Text colour used when the event is listed beside the chart.
    pub legend_color: Option<&'static str>,
    pub display_on_chart: bool,
    pub label: Option<EventLabelStyle>,
}

impl ClinicalEvent {
    pub fn day(&self) -> SampleDate {
        parse_sample_date(self.date)
    }

    /// Events without an on-chart label are listed beside the chart instead.
    pub fn is_legend_entry(&self) -> bool {
        !self.display_on_chart && !self.description.is_empty() && self.legend_color.is_some()
    }
}

pub const CLINICAL_EVENTS: [ClinicalEvent; 3] = [
    ClinicalEvent {
        id: "pembro1",
        date: "2025-03-17",
        description: "1ª dosis Pembrolizumab",
        line_color: "rgba(255, 165, 0, 0.8)",
        legend_color: Some("#f97316"),
        display_on_chart: false,
        label: None,
    },
    ClinicalEvent {
        id: "pembro2",
        date: "2025-04-07",
        description: "2ª dosis Pembrolizumab",
        line_color: "rgba(255, 204, 0, 0.8)",
        legend_color: Some("#facc15"),
        display_on_chart: false,
        label: None,
    },
    ClinicalEvent {
        id: "ensayoEnd",
        date: "2025-05-05",
        description: "Fin del Ensayo",
        line_color: "rgba(100, 181, 246, 0.7)",
        legend_color: None,
        display_on_chart: true,
        label: Some(EventLabelStyle {
            content: "Fin del Ensayo",
            position: "center",
            rotation: -90,
            background_color: "rgba(100, 181, 246, 0.5)",
            color: "white",
            font_size: 10,
            font_weight: "bold",
            padding: [6, 6, 4, 4],
            border_radius: 3,
        }),
    },
];
