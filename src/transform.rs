//! Numeric normalization, unit scaling, and rate conversion over a row-set.
//!
//! Every operation consumes the row-set and returns a new one. A cell that
//! fails to parse in [`RowSet::normalize_numeric`] becomes
//! [`Cell::Missing`] - the only tolerated partial data in the system; one
//! malformed number must not invalidate an otherwise valid batch. By
//! contrast, a conversion rate absent from the [`RateTable`] aborts the run:
//! proceeding with a wrong number is worse than not proceeding.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{EtlError, Result};
use crate::rates::RateTable;
use crate::rowset::RowSet;
use crate::value::{round2, Cell};

/// Thousands separators and the dash-family placeholder characters used for
/// absent figures. The ASCII hyphen stays: it is a legitimate minus sign.
static NUMERIC_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\u{2013}\u{2014}\u{2212}]").expect("valid noise pattern"));

/// Strip separators and placeholders, trim, and parse as a float.
fn clean_numeric(text: &str) -> Option<f64> {
    let cleaned = NUMERIC_NOISE.replace_all(text, "");
    cleaned.trim().parse::<f64>().ok()
}

impl RowSet {
    /// Parse one textual column into numbers.
    ///
    /// Comma thousands separators, dash/en-dash/em-dash placeholders, and
    /// surrounding whitespace are stripped before parsing. Cells that still
    /// fail to parse become [`Cell::Missing`] (never zero, never an error)
    /// so downstream logic can choose to drop or impute. Already-numeric
    /// cells pass through.
    ///
    /// # Errors
    /// [`EtlError::Parse`] when `column` is not in the schema.
    pub fn normalize_numeric(self, column: &str) -> Result<Self> {
        let idx = self.column_index(column)?;
        Ok(self.map_column(idx, |cell| match cell {
            Cell::Text(s) => clean_numeric(&s).map_or(Cell::Missing, Cell::Number),
            other => other,
        }))
    }

    /// Drop records whose cell in `column` is missing.
    ///
    /// Records with genuinely absent source data are excluded from the
    /// output rather than coerced into a misleading figure.
    ///
    /// # Errors
    /// [`EtlError::Parse`] when `column` is not in the schema.
    pub fn drop_missing(self, column: &str) -> Result<Self> {
        let idx = self.column_index(column)?;
        Ok(self.retain_rows(|row| !row[idx].is_missing()))
    }

    /// Divide one numeric column by a fixed constant, rounding to two
    /// decimals (e.g. 1000 to go from millions to billions).
    ///
    /// # Errors
    /// [`EtlError::Parse`] when `column` is not in the schema or holds
    /// unnormalized text.
    pub fn scale(self, column: &str, divisor: f64) -> Result<Self> {
        let idx = self.column_index(column)?;
        let mut bad: Option<String> = None;
        let scaled = self.map_column(idx, |cell| match cell {
            Cell::Number(v) => Cell::Number(round2(v / divisor)),
            Cell::Missing => Cell::Missing,
            Cell::Text(s) => {
                bad.get_or_insert_with(|| s.clone());
                Cell::Text(s)
            }
        });
        match bad {
            Some(s) => Err(EtlError::Parse(format!(
                "scale over unnormalized cell {s:?} in column {column:?}"
            ))),
            None => Ok(scaled),
        }
    }

    /// Append one derived column per `(new_column, rate_code)` pair:
    /// `round(base * rate, 2)`.
    ///
    /// All rate codes are resolved up front, before any column is added, so
    /// the row-set is untouched when a code is absent. A `Missing` base
    /// stays `Missing` in every derived column.
    ///
    /// # Errors
    /// [`EtlError::MissingRate`] for a code absent from `rates`;
    /// [`EtlError::Parse`] when `base_column` is not in the schema or holds
    /// unnormalized text.
    pub fn convert(
        self,
        base_column: &str,
        rates: &RateTable,
        outputs: &[(String, String)],
    ) -> Result<Self> {
        let idx = self.column_index(base_column)?;
        let resolved: Vec<(String, f64)> = outputs
            .iter()
            .map(|(name, code)| {
                rates
                    .get(code)
                    .map(|rate| (name.clone(), rate))
                    .ok_or_else(|| EtlError::MissingRate(code.clone()))
            })
            .collect::<Result<_>>()?;
        for row in self.rows() {
            if let Cell::Text(s) = &row[idx] {
                return Err(EtlError::Parse(format!(
                    "convert over unnormalized cell {s:?} in column {base_column:?}"
                )));
            }
        }
        let mut out = self;
        for (name, rate) in resolved {
            out = out.append_column(name, |row| match row[idx] {
                Cell::Number(base) => Cell::Number(round2(base * rate)),
                _ => Cell::Missing,
            });
        }
        Ok(out)
    }
}
