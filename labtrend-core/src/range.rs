//! Reference-range text to numeric bounds.

use serde::{Deserialize, Serialize};

/// Display text used when a measurement carries no reference range.
pub const UNAVAILABLE_RANGE_TEXT: &str = "N/A";

/// Numeric interval read from a lab's reference-range text.
///
/// Either bound may be open. Both are `None` when the text could not be read,
/// in which case `text` still holds the raw string for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub text: String,
}

impl ParsedRange {
    /// Range for a measurement without reference text.
    pub fn unavailable() -> Self {
        Self::unparsed(UNAVAILABLE_RANGE_TEXT)
    }

    fn unparsed(text: &str) -> Self {
        Self {
            min: None,
            max: None,
            text: text.to_string(),
        }
    }

    pub fn has_bounds(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Shortest text that parses back to the same bounds.
    pub fn canonical_text(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(format!("{min}-{max}")),
            (None, Some(max)) => Some(format!("<{max}")),
            (Some(min), None) => Some(format!(">{min}")),
            (None, None) => None,
        }
    }
}

/// Parse a reference range such as `[3.5-5.5]`, `3,5 - 5,5`, `<= 10`, `>2` or
/// `Insuf: 10-20 Suf: 30-100`.
///
/// Decimal commas are read as points. Patterns are tried in order: bracketed
/// interval, bare interval spanning the whole text, upper bound, lower bound,
/// `Suf:`/`Suficiencia:` block. A matched pattern whose numbers are malformed
/// (`1.2.3`) yields an unparsed range rather than a partial one.
pub fn parse_ref_range(raw: Option<&str>) -> ParsedRange {
    let Some(raw) = raw.filter(|text| !text.is_empty()) else {
        return ParsedRange::unavailable();
    };

    let normalized = raw.replace(',', ".");
    let captures = bracketed_interval(&normalized)
        .map(|(min, max)| (Some(min), Some(max)))
        .or_else(|| bare_interval(&normalized).map(|(min, max)| (Some(min), Some(max))))
        .or_else(|| bound_after(&normalized, '<').map(|max| (None, Some(max))))
        .or_else(|| bound_after(&normalized, '>').map(|min| (Some(min), None)))
        .or_else(|| sufficiency_block(&normalized).map(|(min, max)| (Some(min), max)));

    let Some((min, max)) = captures else {
        tracing::debug!(ref_range = raw, "reference range not recognised");
        return ParsedRange::unparsed(raw);
    };

    match (parse_bound(min), parse_bound(max)) {
        (Ok(min), Ok(max)) => ParsedRange {
            min,
            max,
            text: raw.to_string(),
        },
        _ => {
            tracing::debug!(ref_range = raw, "malformed number in reference range");
            ParsedRange::unparsed(raw)
        }
    }
}

fn parse_bound(capture: Option<&str>) -> Result<Option<f64>, std::num::ParseFloatError> {
    capture.map(str::parse::<f64>).transpose()
}

/// `[ min - max ]` anywhere in the text.
fn bracketed_interval(text: &str) -> Option<(&str, &str)> {
    suffixes_after(text, '[').find_map(|rest| {
        let mut cursor = Cursor::new(rest);
        cursor.skip_whitespace();
        let min = cursor.number()?;
        cursor.skip_whitespace();
        cursor.eat('-').then_some(())?;
        cursor.skip_whitespace();
        let max = cursor.number()?;
        cursor.skip_whitespace();
        cursor.eat(']').then_some((min, max))
    })
}

/// `min - max` covering the whole text.
fn bare_interval(text: &str) -> Option<(&str, &str)> {
    let mut cursor = Cursor::new(text);
    let min = cursor.number()?;
    cursor.skip_whitespace();
    cursor.eat('-').then_some(())?;
    cursor.skip_whitespace();
    let max = cursor.number()?;
    cursor.at_end().then_some((min, max))
}

/// `<value`, `<= value`, `>value`, `>= value` anywhere in the text.
fn bound_after(text: &str, comparator: char) -> Option<&str> {
    suffixes_after(text, comparator).find_map(|rest| {
        let mut cursor = Cursor::new(rest);
        cursor.skip_whitespace();
        cursor.eat('=');
        cursor.skip_whitespace();
        cursor.number()
    })
}

/// `Suf: min` or `Suficiencia: min-max`, as printed for vitamin D panels.
fn sufficiency_block(text: &str) -> Option<(&str, Option<&str>)> {
    text.char_indices().find_map(|(index, _)| {
        let tail = &text[index..];
        ["Suficiencia", "Suf"].into_iter().find_map(|label| {
            let mut cursor = Cursor::new(tail.strip_prefix(label)?);
            cursor.skip_whitespace();
            cursor.eat(':').then_some(())?;
            cursor.skip_whitespace();
            let min = cursor.number()?;

            let mut upper = cursor;
            upper.skip_whitespace();
            let max = if upper.eat('-') {
                upper.skip_whitespace();
                upper.number()
            } else {
                None
            };
            Some((min, max))
        })
    })
}

/// Remainders of `text` following each occurrence of `marker`, left to right.
fn suffixes_after(text: &str, marker: char) -> impl Iterator<Item = &str> {
    text.match_indices(marker)
        .map(move |(index, matched)| &text[index + matched.len()..])
}

#[derive(Clone, Copy)]
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest }
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.rest.strip_prefix(expected) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// Run of ASCII digits and points; validity is checked by the caller.
    fn number(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (number, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(number)
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }
}
