//! # Rowforge
//!
//! A **small batch ETL engine** for ranked-table sources: fetch one page,
//! extract the one table that matches a structural signature, normalize and
//! convert a handful of numeric columns, and persist the result to a flat
//! file and an embedded relational store - idempotently, so a re-run leaves
//! a single terminal state instead of runaway duplication.
//!
//! ## The pipeline
//!
//! Five stages, each consuming the prior stage's row-set and producing a
//! new one:
//!
//! 1. **Locate** - find the one table matching a [`TableLocator`] predicate
//! 2. **Project** - select positional source columns into canonical names
//! 3. **Normalize** - clean textual numbers; unparseable cells become an
//!    explicit missing marker, never zero
//! 4. **Convert** - derive currency/unit columns from a [`RateTable`],
//!    rounded to two decimals; an unknown rate code aborts the run
//! 5. **Load** - overwrite the flat file and replace the relational table
//!    (batch), or append and upsert-by-date (time series)
//!
//! ## Quick start
//!
//! ```ignore
//! use rowforge::{catalog, HttpFetcher, TablePipeline};
//!
//! fn main() -> anyhow::Result<()> {
//!     let pipeline = TablePipeline::new(catalog::banks());
//!     let fetcher = HttpFetcher::default_client()?;
//!     let report = pipeline.run(&fetcher)?;
//!     println!("{} rows loaded", report.rows_loaded);
//!     Ok(())
//! }
//! ```
//!
//! Tests swap the network for a fixture body:
//!
//! ```ignore
//! use rowforge::testing::StaticFetch;
//!
//! let fetch = StaticFetch::new(rowforge::testing::BANKS_FIXTURE);
//! let report = pipeline.run(&fetch)?;
//! ```
//!
//! ## Failure model
//!
//! Five fatal error kinds ([`EtlError`]): fetch, not-found, parse, missing
//! rate, and load. None are retried and none are downgraded; a failed run
//! is re-invoked from the start. The single tolerated partial-data
//! condition is a per-cell numeric parse failure, which becomes
//! [`Cell::Missing`].
//!
//! ## Module overview
//!
//! - [`mod@locate`] - structural table location over a parsed document
//! - [`mod@project`] - positional projection into the canonical row shape
//! - [`transform`] - numeric normalization, scaling, and rate conversion
//! - [`rates`] - the conversion-rate lookup
//! - [`io`] - flat-file and relational sinks
//! - [`pipeline`] / [`observation`] - the batch and time-series orchestrators
//! - [`catalog`] - the four shipped pipeline configurations
//! - [`testing`] - fixtures and the fetch test double

pub mod catalog;
pub mod error;
pub mod fetch;
pub mod io;
pub mod locate;
pub mod observation;
pub mod pipeline;
pub mod project;
pub mod rates;
pub mod rowset;
pub mod testing;
pub mod transform;
pub mod value;

pub use error::{EtlError, Result};
pub use fetch::{Fetch, HttpFetcher};
pub use io::csv::{append_row, write_rowset, WriteMode};
pub use io::sqlite::{fetch_rows, replace_table, upsert_observation};
pub use locate::{locate, RawTable, TableLocator};
pub use observation::{
    extract_observation, Observation, ObservationConfig, ObservationPipeline,
};
pub use pipeline::{
    Conversion, RunReport, RunState, Scale, TablePipeline, TablePipelineConfig,
};
pub use project::project;
pub use rates::RateTable;
pub use rowset::RowSet;
pub use value::{round2, Cell};
