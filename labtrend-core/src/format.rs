//! es-ES display strings for chart ticks, tooltips and the event legend.

use chrono::{Datelike, NaiveDate};

use crate::{date::SampleDate, Measurement};

const SHORT_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

pub const UNKNOWN_DATE_LABEL: &str = "Fecha desconocida";

/// `17/03/2025`.
pub fn day_month_year(day: NaiveDate) -> String {
    day.format("%d/%m/%Y").to_string()
}

/// `17 mar`.
pub fn day_short_month(day: NaiveDate) -> String {
    format!("{:02} {}", day.day(), SHORT_MONTHS[day.month0() as usize])
}

pub fn tooltip_title(date: SampleDate) -> String {
    match date {
        SampleDate::Day(day) => day_month_year(day),
        SampleDate::Unknown => UNKNOWN_DATE_LABEL.to_string(),
    }
}

/// `Hemoglobina: 13.2 g/dL (Ref: [12-16]) (post transfusión)`.
///
/// `unit` is the series unit; the reference and note segments are left out
/// when the measurement has none.
pub fn tooltip_body(parameter: &str, unit: &str, measurement: &Measurement) -> String {
    let mut body = format!("{parameter}: {} {unit}", measurement.value);

    if let Some(ref_range) = measurement.ref_range.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!(" (Ref: {ref_range})"));
    }
    if let Some(note) = measurement.note.as_deref().filter(|s| !s.is_empty()) {
        body.push_str(&format!(" ({note})"));
    }

    body
}
