//! Chronological ordering of a parameter's measurements.

use crate::Measurement;

/// Copy of `measurements` sorted by sample day, oldest first.
///
/// The sort is stable, so samples taken the same day keep their source order,
/// and unreadable dates go last.
pub fn normalize_series(measurements: &[Measurement]) -> Vec<Measurement> {
    let mut keyed: Vec<_> = measurements
        .iter()
        .map(|measurement| (measurement.sample_date(), measurement))
        .collect();
    keyed.sort_by_key(|(date, _)| *date);
    keyed
        .into_iter()
        .map(|(_, measurement)| measurement.clone())
        .collect()
}
