//! Testing utilities for pipeline code.
//!
//! This module provides:
//! - **Fixture documents**: small HTML and JSON bodies shaped like the real
//!   sources, including a decoy table and a placeholder-valued cell
//! - **Fetch test double**: [`StaticFetch`] serves a fixed body so whole
//!   pipelines run without the network
//! - **Scratch helpers**: rate files and temp directories for sink tests

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::error::Result;
use crate::fetch::Fetch;

/// A ranked-table document: one decoy table first, then the target table
/// carrying both `wikitable` and `sortable` class tokens. The target has a
/// `<th>` header row and three data rows, the last with a placeholder dash
/// for its figure.
pub const BANKS_FIXTURE: &str = r#"<html><body>
<h1>Ranked tables</h1>
<table class="infobox">
  <tbody>
    <tr><td>note</td><td>decoy</td></tr>
  </tbody>
</table>
<table class="wikitable sortable">
  <thead>
    <tr><th>Rank</th><th>Bank name</th><th>Market cap (US$ billion)</th></tr>
  </thead>
  <tbody>
    <tr><td>1</td><td>Bank A</td><td>100</td></tr>
    <tr><td>2</td><td>Bank B</td><td>50.5</td></tr>
    <tr><td>3</td><td>Bank C</td><td>—</td></tr>
  </tbody>
</table>
</body></html>"#;

/// A rank/film/year document whose only structure is a bare `<tbody>`,
/// with one ragged footer row that is too short for a three-column
/// projection.
pub const FILMS_FIXTURE: &str = r#"<html><body>
<table>
  <tbody>
    <tr><th>Average Rank</th><th>Film</th><th>Year</th></tr>
    <tr><td>1</td><td>The Godfather</td><td>1972</td></tr>
    <tr><td>2</td><td>Citizen Kane</td><td>1941</td></tr>
    <tr><td>3</td><td>Casablanca</td><td>1942</td></tr>
    <tr><td>as published</td></tr>
  </tbody>
</table>
</body></html>"#;

/// A wttr.in-shaped payload: current temperature plus two forecast days.
///
/// `noon` controls whether tomorrow carries a `"1200"` hourly entry; pass
/// `None` to exercise the daily-average fallback (`avg`).
pub fn weather_fixture_json(observed: i64, noon: Option<i64>, avg: i64) -> String {
    let mut hourly = vec![json!({"time": "0", "tempC": "11"})];
    if let Some(noon) = noon {
        hourly.push(json!({"time": "1200", "tempC": noon.to_string()}));
    }
    hourly.push(json!({"time": "2100", "tempC": "12"}));
    json!({
        "current_condition": [{"temp_C": observed.to_string()}],
        "weather": [
            {"avgtempC": "15", "hourly": [{"time": "1200", "tempC": "16"}]},
            {"avgtempC": avg.to_string(), "hourly": hourly},
        ]
    })
    .to_string()
}

/// Serves one fixed body for every URL - the network stand-in for
/// pipeline-level tests.
pub struct StaticFetch {
    body: String,
}

impl StaticFetch {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}

impl Fetch for StaticFetch {
    fn get(&self, _url: &str) -> Result<String> {
        Ok(self.body.clone())
    }
}

/// Write a two-column rate file under `dir` and return its path.
pub fn write_rates_file(dir: &Path, pairs: &[(&str, f64)]) -> std::io::Result<PathBuf> {
    let path = dir.join("exchange_rates.csv");
    let mut body = String::from("Currency,Rate\n");
    for (code, rate) in pairs {
        body.push_str(&format!("{code},{rate}\n"));
    }
    std::fs::write(&path, body)?;
    Ok(path)
}
