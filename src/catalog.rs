//! The four shipped pipeline configurations.
//!
//! Each function returns a plain config value; callers may override any
//! field (the CLI does this for paths and URLs) before handing it to an
//! orchestrator.

use crate::locate::TableLocator;
use crate::observation::ObservationConfig;
use crate::pipeline::{Conversion, Scale, TablePipelineConfig};

/// Largest banks by market capitalization, with GBP/EUR/INR conversions
/// from a local rate file.
pub fn banks() -> TablePipelineConfig {
    TablePipelineConfig {
        name: "banks".into(),
        url: "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks".into(),
        locator: TableLocator::with_classes(["wikitable", "sortable"]),
        source_indices: vec![1, 2],
        columns: vec!["Name".into(), "MC_USD_billion".into()],
        header_sentinel: None,
        numeric_column: Some("MC_USD_billion".into()),
        drop_missing: false,
        scale: None,
        rename: Some(("MC_USD_billion".into(), "Market_Cap_USD_billion".into())),
        conversion: Some(Conversion {
            rates_path: "exchange_rates.csv".into(),
            base_column: "Market_Cap_USD_billion".into(),
            outputs: vec![
                ("MC_GBP_billion".into(), "GBP".into()),
                ("MC_EUR_billion".into(), "EUR".into()),
                ("MC_INR_billion".into(), "INR".into()),
            ],
        }),
        limit: None,
        out_path: "largest_banks_data.csv".into(),
        db_path: "banks.db".into(),
        table: "largest_banks".into(),
    }
}

/// Countries by nominal GDP, scaled from millions to billions; records with
/// no published figure are dropped.
pub fn gdp() -> TablePipelineConfig {
    TablePipelineConfig {
        name: "gdp".into(),
        url: "https://web.archive.org/web/20230902185326/https://en.wikipedia.org/wiki/List_of_countries_by_GDP_%28nominal%29".into(),
        locator: TableLocator::with_classes(["wikitable", "sortable"]),
        source_indices: vec![0, 2],
        columns: vec!["Country".into(), "GDP_USD_millions".into()],
        header_sentinel: Some("Country/Territory".into()),
        numeric_column: Some("GDP_USD_millions".into()),
        drop_missing: true,
        scale: Some(Scale {
            column: "GDP_USD_millions".into(),
            divisor: 1000.0,
        }),
        rename: Some(("GDP_USD_millions".into(), "GDP_USD_billions".into())),
        conversion: None,
        limit: None,
        out_path: "Countries_by_GDP.csv".into(),
        db_path: "World_Economies.db".into(),
        table: "Countries_by_GDP".into(),
    }
}

/// Most highly ranked films; the first fifty, as published.
pub fn films() -> TablePipelineConfig {
    TablePipelineConfig {
        name: "films".into(),
        url: "https://web.archive.org/web/20230902185655/https://en.everybodywiki.com/100_Most_Highly-Ranked_Films".into(),
        locator: TableLocator::FirstBody,
        source_indices: vec![0, 1, 2],
        columns: vec!["Average_Rank".into(), "Film".into(), "Year".into()],
        header_sentinel: None,
        numeric_column: None,
        drop_missing: false,
        scale: None,
        rename: None,
        conversion: None,
        limit: Some(50),
        out_path: "top_50_films.csv".into(),
        db_path: "Movies.db".into(),
        table: "Top_50".into(),
    }
}

/// Daily observation/forecast pair for one city from the wttr.in JSON API.
pub fn weather(city: &str) -> ObservationConfig {
    ObservationConfig {
        name: "weather".into(),
        url: format!("https://wttr.in/{city}?format=j1"),
        out_path: "weather_data.tsv".into(),
        db_path: "weather_data.db".into(),
        table: "weather_reports".into(),
    }
}
