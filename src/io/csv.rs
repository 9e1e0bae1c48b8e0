//! Flat-file sink for row-sets.
//!
//! Two modes:
//! - **Overwrite** (batch pipelines): the final file is exactly header plus
//!   current rows, with no trace of any prior run. The write goes to a temp
//!   file in the target directory and is renamed over the destination, so a
//!   failed run never leaves a half-written file behind.
//! - **Append** (time-series pipeline): the header is written only when the
//!   target file does not yet exist, then exactly one line per record.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tempfile::NamedTempFile;

use crate::error::{EtlError, Result};
use crate::rowset::RowSet;

/// Flat-file write discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate: the file reflects exactly the current row-set.
    Overwrite,
    /// Preserve and extend; header only on first creation.
    Append,
}

/// Write a row-set to a delimited file.
///
/// # Returns
/// The number of data records written.
///
/// # Errors
/// [`EtlError::Load`] on any file or serialization failure.
pub fn write_rowset(
    path: impl AsRef<Path>,
    rowset: &RowSet,
    mode: WriteMode,
    delimiter: u8,
) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    match mode {
        WriteMode::Overwrite => overwrite(path, rowset, delimiter),
        WriteMode::Append => {
            let header: Vec<&str> = rowset.columns().iter().map(String::as_str).collect();
            for row in rowset.rows() {
                let fields: Vec<String> = row.iter().map(|c| c.to_field()).collect();
                append_row(path, &header, &fields, delimiter)?;
            }
            Ok(rowset.len())
        }
    }
}

fn overwrite(path: &Path, rowset: &RowSet, delimiter: u8) -> Result<usize> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .from_writer(&mut tmp);
        writer.write_record(rowset.columns())?;
        for row in rowset.rows() {
            writer.write_record(row.iter().map(|c| c.to_field()))?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().flush()?;
    tmp.persist(path)
        .map_err(|e| EtlError::Load(format!("persist {}: {e}", path.display())))?;
    Ok(rowset.len())
}

/// Append one delimited record, writing `header` first if the file does not
/// yet exist.
///
/// # Errors
/// [`EtlError::Load`] on any file or serialization failure.
pub fn append_row(
    path: impl AsRef<Path>,
    header: &[&str],
    fields: &[String],
    delimiter: u8,
) -> Result<()> {
    let path = path.as_ref();
    let fresh = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_writer(file);
    if fresh {
        writer.write_record(header)?;
    }
    writer.write_record(fields)?;
    writer.flush()?;
    Ok(())
}
