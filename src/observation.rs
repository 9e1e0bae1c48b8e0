//! Time-series variant: a daily weather observation/forecast pair from a
//! JSON API, persisted with upsert-by-date semantics.

use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::{EtlError, Result};
use crate::fetch::Fetch;
use crate::io;
use crate::pipeline::{RunReport, RunState};

/// One persisted record. Natural key: `(year, month, day)` - at most one
/// record per key exists in the store at any time.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Observed temperature at capture time, °C.
    pub observed: i64,
    /// Forecast temperature for tomorrow noon, °C.
    pub forecast: i64,
    /// Capture timestamp, RFC 3339.
    pub captured_at: String,
}

/// Flat-file header for the observation log.
const OBSERVATION_HEADER: [&str; 5] = ["year", "month", "day", "observed", "forecast"];

// Shape of the wttr.in `format=j1` payload, reduced to the fields the
// pipeline reads. All temperatures arrive as decimal strings.
#[derive(Debug, Deserialize)]
struct WeatherPayload {
    current_condition: Vec<CurrentCondition>,
    weather: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
}

#[derive(Debug, Deserialize)]
struct DailyForecast {
    #[serde(rename = "avgtempC")]
    avg_temp_c: String,
    hourly: Vec<HourlyForecast>,
}

#[derive(Debug, Deserialize)]
struct HourlyForecast {
    time: String,
    #[serde(rename = "tempC")]
    temp_c: String,
}

fn parse_temp(raw: &str, what: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| EtlError::Parse(format!("non-numeric {what} temperature {raw:?}")))
}

/// Decode a weather payload into the observation for `date`.
///
/// The forecast is tomorrow's noon (`"1200"`) entry; when the payload
/// carries no noon entry the daily average stands in for it.
///
/// # Errors
/// [`EtlError::Parse`] for a malformed payload, a missing current
/// condition, or fewer than two forecast days.
pub fn extract_observation(
    body: &str,
    date: NaiveDate,
    captured_at: String,
) -> Result<Observation> {
    let payload: WeatherPayload = serde_json::from_str(body)
        .map_err(|e| EtlError::Parse(format!("weather payload: {e}")))?;
    let current = payload
        .current_condition
        .first()
        .ok_or_else(|| EtlError::Parse("weather payload has no current condition".into()))?;
    let observed = parse_temp(&current.temp_c, "observed")?;

    let tomorrow = payload
        .weather
        .get(1)
        .ok_or_else(|| EtlError::Parse("weather payload has no forecast for tomorrow".into()))?;
    let noon = tomorrow.hourly.iter().find(|h| h.time == "1200");
    let forecast = match noon {
        Some(hour) => parse_temp(&hour.temp_c, "forecast")?,
        None => parse_temp(&tomorrow.avg_temp_c, "average forecast")?,
    };

    Ok(Observation {
        year: date.year(),
        month: date.month(),
        day: date.day(),
        observed,
        forecast,
        captured_at,
    })
}

/// Configuration for one observation pipeline instance.
#[derive(Debug, Clone)]
pub struct ObservationConfig {
    pub name: String,
    pub url: String,
    /// Tab-separated append log.
    pub out_path: PathBuf,
    pub db_path: PathBuf,
    pub table: String,
}

/// The time-series orchestrator: fetch, decode, stamp, append, upsert.
pub struct ObservationPipeline {
    config: ObservationConfig,
}

impl ObservationPipeline {
    pub fn new(config: ObservationConfig) -> Self {
        Self { config }
    }

    /// Execute one run. The natural key is today's local date; re-running
    /// on the same day replaces that day's persisted record.
    ///
    /// # Errors
    /// Any [`EtlError`] aborts the run as a whole.
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
        let cfg = &self.config;
        info!(pipeline = %cfg.name, state = %RunState::Extracting, url = %cfg.url, "fetching observation");
        let body = fetch.get(&cfg.url)?;

        info!(pipeline = %cfg.name, state = %RunState::Transforming, "decoding observation");
        let now = Local::now();
        let obs = extract_observation(&body, now.date_naive(), now.to_rfc3339())?;
        self.load(&obs)?;
        Ok(RunReport {
            pipeline: cfg.name.clone(),
            rows_loaded: 1,
            state: RunState::Done,
        })
    }

    /// Load one observation into both sinks.
    ///
    /// Exposed separately so tests can drive the load with a fixed date
    /// instead of today's.
    pub fn load(&self, obs: &Observation) -> Result<()> {
        let cfg = &self.config;
        info!(pipeline = %cfg.name, state = %RunState::Loading, "loading observation");
        let fields = vec![
            obs.year.to_string(),
            obs.month.to_string(),
            obs.day.to_string(),
            obs.observed.to_string(),
            obs.forecast.to_string(),
        ];
        io::csv::append_row(&cfg.out_path, &OBSERVATION_HEADER, &fields, b'\t')?;
        let conn = Connection::open(&cfg.db_path)?;
        io::sqlite::upsert_observation(&conn, &cfg.table, obs)
    }
}
