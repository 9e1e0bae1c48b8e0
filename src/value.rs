//! The tagged cell value and numeric rounding helpers.
//!
//! Source tables carry untyped text; the projector and normalizer turn each
//! cell into a [`Cell`] so every downstream stage operates on a known shape.
//! `Missing` is an explicit marker for a value that failed to parse - it is
//! not zero and not an absent field, and sinks render it as an empty CSV
//! field or a SQL `NULL`.

use std::fmt;

/// A single cell in a row-set.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Raw or canonical text.
    Text(String),
    /// A parsed numeric value.
    Number(f64),
    /// Explicit missing marker for an unparseable value.
    Missing,
}

impl Cell {
    /// Construct a text cell from anything string-like.
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// The numeric value, if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The text value, if this cell holds one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Render the cell as a flat-file field.
    ///
    /// Whole numbers keep one decimal place so a re-run produces
    /// byte-identical output regardless of how the value was computed.
    pub fn to_field(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) if v.fract() == 0.0 => format!("{v:.1}"),
            Cell::Number(v) => format!("{v}"),
            Cell::Missing => String::new(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field())
    }
}

/// Round to exactly two decimal places, half away from zero.
///
/// Monetary conversions and unit scaling are fixed at two decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
