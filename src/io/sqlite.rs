//! Relational sink over an embedded SQLite store.
//!
//! Two load disciplines:
//! - [`replace_table`]: drop and recreate the target table, bulk-insert the
//!   entire row-set - all inside one transaction, so a failed load leaves
//!   the previous image intact. Used when a run is a full re-snapshot of
//!   the source.
//! - [`upsert_observation`]: create-if-absent with a uniqueness constraint
//!   on the natural key, then insert-or-replace, so a re-run for the same
//!   calendar day corrects rather than duplicates that day's record.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use crate::error::Result;
use crate::observation::Observation;
use crate::rowset::RowSet;
use crate::value::Cell;

/// Quote an identifier from pipeline configuration for use in SQL text.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite column affinity for one canonical column: REAL when every
/// non-missing cell is numeric, TEXT otherwise.
fn column_affinity(rowset: &RowSet, index: usize) -> &'static str {
    let mut numeric = false;
    for row in rowset.rows() {
        match &row[index] {
            Cell::Number(_) => numeric = true,
            Cell::Text(_) => return "TEXT",
            Cell::Missing => {}
        }
    }
    if numeric { "REAL" } else { "TEXT" }
}

fn cell_to_value(cell: &Cell) -> Value {
    match cell {
        Cell::Text(s) => Value::Text(s.clone()),
        Cell::Number(v) => Value::Real(*v),
        Cell::Missing => Value::Null,
    }
}

/// Replace-table load: the persisted table becomes exactly `rowset`.
///
/// Idempotent: running twice with identical input yields an identical
/// table. The drop, create, and inserts commit atomically.
///
/// # Returns
/// The number of records inserted.
///
/// # Errors
/// [`EtlError::Load`](crate::EtlError::Load) on any store error.
pub fn replace_table(conn: &mut Connection, table: &str, rowset: &RowSet) -> Result<usize> {
    let ident = quote_ident(table);
    let columns: Vec<String> = rowset
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {}", quote_ident(name), column_affinity(rowset, i)))
        .collect();
    let placeholders: Vec<String> = (1..=rowset.columns().len())
        .map(|i| format!("?{i}"))
        .collect();

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {ident}; CREATE TABLE {ident} ({});",
        columns.join(", ")
    ))?;
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {ident} VALUES ({})",
            placeholders.join(", ")
        ))?;
        for row in rowset.rows() {
            insert.execute(params_from_iter(row.iter().map(cell_to_value)))?;
        }
    }
    tx.commit()?;
    Ok(rowset.len())
}

/// Upsert-by-key load for the daily observation record.
///
/// The table is created on first use with `UNIQUE(year, month, day)`; an
/// insert for an existing key replaces the earlier record's non-key fields.
///
/// # Errors
/// [`EtlError::Load`](crate::EtlError::Load) on any store error.
pub fn upsert_observation(conn: &Connection, table: &str, obs: &Observation) -> Result<()> {
    let ident = quote_ident(table);
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {ident} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            year INTEGER NOT NULL,
            month INTEGER NOT NULL,
            day INTEGER NOT NULL,
            observed INTEGER NOT NULL,
            forecast INTEGER NOT NULL,
            captured_at TEXT NOT NULL,
            UNIQUE(year, month, day)
        );"
    ))?;
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO {ident}
             (year, month, day, observed, forecast, captured_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
        ),
        params![
            obs.year,
            obs.month,
            obs.day,
            obs.observed,
            obs.forecast,
            obs.captured_at
        ],
    )?;
    Ok(())
}

/// Read the persisted image of `table` back, one `Vec` of column values per
/// row. Verification helper for callers and tests.
///
/// # Errors
/// [`EtlError::Load`](crate::EtlError::Load) on any store error.
pub fn fetch_rows(conn: &Connection, table: &str) -> Result<Vec<Vec<Value>>> {
    let mut stmt = conn.prepare(&format!("SELECT * FROM {}", quote_ident(table)))?;
    let width = stmt.column_count();
    let rows = stmt.query_map([], |row| {
        (0..width).map(|i| row.get::<_, Value>(i)).collect::<std::result::Result<Vec<_>, _>>()
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
