//! Column projector: positional source columns into the canonical row shape.

use crate::error::{EtlError, Result};
use crate::locate::RawTable;
use crate::rowset::RowSet;
use crate::value::Cell;

/// Select `indices` (0-based, into the source columns) from every data row
/// of `raw` and relabel them to `names`.
///
/// Rows too short to supply every projected index are skipped - ragged rows
/// are a fact of loosely-structured markup (spanning headers, footers). A
/// table where NO row is wide enough is under-width for this projection and
/// fails rather than passing an inconsistent schema downstream.
///
/// # Panics
/// Panics when `indices` and `names` differ in length - a caller
/// programming error, not a runtime data condition.
///
/// # Errors
/// [`EtlError::Parse`] when `raw` has data rows but none wide enough.
pub fn project(raw: &RawTable, indices: &[usize], names: &[String]) -> Result<RowSet> {
    assert_eq!(
        indices.len(),
        names.len(),
        "projection indices and canonical names must align"
    );
    let width = indices.iter().copied().max().map_or(0, |m| m + 1);
    let mut out = RowSet::new(names.to_vec());
    for row in &raw.rows {
        if row.len() < width {
            continue;
        }
        out.push(indices.iter().map(|&i| Cell::text(row[i].trim())).collect());
    }
    if out.is_empty() && !raw.rows.is_empty() {
        return Err(EtlError::Parse(format!(
            "located table is narrower than the projection (needs {width} columns)"
        )));
    }
    Ok(out)
}

impl RowSet {
    /// Drop the leading record when its first value textually equals a known
    /// header sentinel (e.g. `"Country"` appearing as a data value).
    ///
    /// Guards against parsers that fail to keep header rows out of the body.
    pub fn drop_header_sentinel(mut self, sentinel: &str) -> Self {
        let is_header = self
            .rows()
            .first()
            .and_then(|row| row.first())
            .and_then(Cell::as_text)
            .is_some_and(|v| v == sentinel);
        if is_header {
            self.remove_first_row();
        }
        self
    }
}
