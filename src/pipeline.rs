//! The batch orchestrator: Extracting → Transforming → Loading → Done.
//!
//! Transitions are strictly sequential and forward-only within one
//! invocation; the terminal `Failed` state is reachable from any of the
//! first three and there is no retry or resume - a failed run is re-invoked
//! from the start. The two sinks are independent: a failure in the
//! relational write does not roll back the flat file (the flat-file write
//! itself is atomic via temp-file rename).
//!
//! # Design notes
//! - All knobs live in [`TablePipelineConfig`], passed at construction; no
//!   module-level configuration. Several differently-configured pipelines
//!   can coexist in one process.
//! - The fetch collaborator is injected as `&dyn Fetch`, so tests run the
//!   whole pipeline against fixture bodies.

use std::fmt;
use std::path::PathBuf;

use rusqlite::Connection;
use scraper::Html;
use tracing::{error, info};

use crate::error::Result;
use crate::fetch::Fetch;
use crate::io::{self, csv::WriteMode};
use crate::locate::{locate, TableLocator};
use crate::project::project;
use crate::rates::RateTable;
use crate::rowset::RowSet;

/// Run states, in order. `Failed` is terminal and reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Extracting,
    Transforming,
    Loading,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Extracting => "extracting",
            RunState::Transforming => "transforming",
            RunState::Loading => "loading",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub pipeline: String,
    /// Records present in both sinks on completion.
    pub rows_loaded: usize,
    /// Always [`RunState::Done`] - failed runs return an error instead.
    pub state: RunState,
}

/// Currency/unit conversion block: where the rates live and which derived
/// columns to produce from which codes.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub rates_path: PathBuf,
    pub base_column: String,
    /// Ordered `(new_column, rate_code)` pairs.
    pub outputs: Vec<(String, String)>,
}

/// Fixed-constant unit scaling (e.g. millions → billions).
#[derive(Debug, Clone)]
pub struct Scale {
    pub column: String,
    pub divisor: f64,
}

/// Everything one batch pipeline instance needs, owned by the caller.
#[derive(Debug, Clone)]
pub struct TablePipelineConfig {
    pub name: String,
    pub url: String,
    pub locator: TableLocator,
    /// 0-based positions into the source table's columns.
    pub source_indices: Vec<usize>,
    /// Canonical names for the projected columns, same order and length.
    pub columns: Vec<String>,
    /// Leading data value that marks a leaked header row.
    pub header_sentinel: Option<String>,
    /// Column to normalize into numbers, if any.
    pub numeric_column: Option<String>,
    /// Drop records whose numeric column is missing.
    pub drop_missing: bool,
    pub scale: Option<Scale>,
    /// Relabel `(from, to)`, applied after normalization and scaling.
    pub rename: Option<(String, String)>,
    pub conversion: Option<Conversion>,
    /// Keep only the first N records.
    pub limit: Option<usize>,
    /// Comma-delimited overwrite target.
    pub out_path: PathBuf,
    pub db_path: PathBuf,
    pub table: String,
}

/// The batch orchestrator. Owns the row-set for the duration of one run;
/// nothing retains it afterwards.
pub struct TablePipeline {
    config: TablePipelineConfig,
}

impl TablePipeline {
    pub fn new(config: TablePipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TablePipelineConfig {
        &self.config
    }

    /// Execute one run against the injected fetch collaborator.
    ///
    /// On `Ok`, both sinks reflect the final row-set: the flat file as a
    /// full overwrite, the relational table under replace-table discipline.
    ///
    /// # Errors
    /// Any [`EtlError`](crate::EtlError) aborts the run as a whole; the
    /// error kind is logged before it propagates.
    pub fn run(&self, fetch: &dyn Fetch) -> Result<RunReport> {
        match self.execute(fetch) {
            Ok(report) => {
                info!(pipeline = %self.config.name, rows = report.rows_loaded, "run complete");
                Ok(report)
            }
            Err(err) => {
                error!(pipeline = %self.config.name, kind = err.kind(), "run failed: {err}");
                Err(err)
            }
        }
    }

    fn execute(&self, fetch: &dyn Fetch) -> Result<RunReport> {
        let rows = self.extract(fetch)?;
        let rows = self.transform(rows)?;
        let loaded = self.load(&rows)?;
        Ok(RunReport {
            pipeline: self.config.name.clone(),
            rows_loaded: loaded,
            state: RunState::Done,
        })
    }

    fn extract(&self, fetch: &dyn Fetch) -> Result<RowSet> {
        let cfg = &self.config;
        info!(pipeline = %cfg.name, state = %RunState::Extracting, url = %cfg.url, "fetching source");
        let body = fetch.get(&cfg.url)?;
        let document = Html::parse_document(&body);
        let raw = locate(&document, &cfg.locator)?;
        let mut rows = project(&raw, &cfg.source_indices, &cfg.columns)?;
        if let Some(sentinel) = &cfg.header_sentinel {
            rows = rows.drop_header_sentinel(sentinel);
        }
        Ok(rows)
    }

    fn transform(&self, mut rows: RowSet) -> Result<RowSet> {
        let cfg = &self.config;
        info!(pipeline = %cfg.name, state = %RunState::Transforming, records = rows.len(), "transforming");
        if let Some(column) = &cfg.numeric_column {
            rows = rows.normalize_numeric(column)?;
            if cfg.drop_missing {
                rows = rows.drop_missing(column)?;
            }
        }
        if let Some(scale) = &cfg.scale {
            rows = rows.scale(&scale.column, scale.divisor)?;
        }
        if let Some((from, to)) = &cfg.rename {
            rows = rows.rename_column(from, to)?;
        }
        if let Some(conversion) = &cfg.conversion {
            let rates = RateTable::from_path(&conversion.rates_path)?;
            rows = rows.convert(&conversion.base_column, &rates, &conversion.outputs)?;
        }
        if let Some(n) = cfg.limit {
            rows = rows.limit(n);
        }
        Ok(rows)
    }

    /// Both sink writes. The connection is scoped to this method and
    /// released on every exit path.
    fn load(&self, rows: &RowSet) -> Result<usize> {
        let cfg = &self.config;
        info!(pipeline = %cfg.name, state = %RunState::Loading, records = rows.len(), "loading");
        io::csv::write_rowset(&cfg.out_path, rows, WriteMode::Overwrite, b',')?;
        let mut conn = Connection::open(&cfg.db_path)?;
        io::sqlite::replace_table(&mut conn, &cfg.table, rows)
    }
}
