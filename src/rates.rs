//! Conversion-rate lookup loaded once per run from a delimited file.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{EtlError, Result};

/// Map from currency/unit code to a positive conversion factor.
///
/// Loaded fully into memory at the start of the transform stage. There is
/// deliberately no default rate: a code the table does not carry fails the
/// conversion with [`EtlError::MissingRate`].
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Load from a two-column delimited file `(code, rate)` with one header
    /// line.
    ///
    /// # Errors
    /// [`EtlError::Parse`] for a missing file, a malformed record, a
    /// non-numeric rate, or a rate that is not strictly positive.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| EtlError::Parse(format!("rate table {}: {e}", path.display())))?;
        let mut rates = HashMap::new();
        for (i, record) in reader.records().enumerate() {
            let record =
                record.map_err(|e| EtlError::Parse(format!("rate table record #{}: {e}", i + 1)))?;
            let code = record
                .get(0)
                .ok_or_else(|| EtlError::Parse(format!("rate table record #{} has no code", i + 1)))?
                .trim()
                .to_string();
            let raw = record
                .get(1)
                .ok_or_else(|| EtlError::Parse(format!("rate table record #{} has no rate", i + 1)))?;
            let rate = raw.trim().parse::<f64>().map_err(|_| {
                EtlError::Parse(format!("rate table: non-numeric rate {raw:?} for {code:?}"))
            })?;
            Self::check_positive(&code, rate)?;
            rates.insert(code, rate);
        }
        Ok(Self { rates })
    }

    /// Build from in-memory pairs, applying the same positivity rule as the
    /// file loader.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut rates = HashMap::new();
        for (code, rate) in pairs {
            let code = code.into();
            Self::check_positive(&code, rate)?;
            rates.insert(code, rate);
        }
        Ok(Self { rates })
    }

    fn check_positive(code: &str, rate: f64) -> Result<()> {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(EtlError::Parse(format!(
                "rate table: rate for {code:?} must be a positive number, got {rate}"
            )));
        }
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
