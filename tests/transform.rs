use rowforge::testing::write_rates_file;
use rowforge::{Cell, EtlError, RateTable, RowSet};

fn one_column(values: &[&str]) -> RowSet {
    RowSet::from_rows(
        vec!["V".into()],
        values.iter().map(|v| vec![Cell::text(*v)]).collect(),
    )
}

#[test]
fn normalize_parses_cleaned_text() -> anyhow::Result<()> {
    let rows = one_column(&["1,234", "—", " 56.7 ", "100", "n/a"]).normalize_numeric("V")?;
    let cells: Vec<&Cell> = rows.rows().iter().map(|r| &r[0]).collect();
    assert_eq!(*cells[0], Cell::Number(1234.0));
    assert_eq!(*cells[1], Cell::Missing);
    assert_eq!(*cells[2], Cell::Number(56.7));
    assert_eq!(*cells[3], Cell::Number(100.0));
    assert_eq!(*cells[4], Cell::Missing);
    Ok(())
}

#[test]
fn normalize_keeps_negative_values_intact() -> anyhow::Result<()> {
    let rows = one_column(&["-2.5"]).normalize_numeric("V")?;
    assert_eq!(rows.rows()[0][0], Cell::Number(-2.5));
    Ok(())
}

#[test]
fn normalize_of_unknown_column_is_a_parse_failure() {
    let err = one_column(&["1"]).normalize_numeric("missing_col").unwrap_err();
    assert!(matches!(err, EtlError::Parse(_)));
}

#[test]
fn drop_missing_excludes_unparseable_records() -> anyhow::Result<()> {
    let rows = one_column(&["10", "—", "30"])
        .normalize_numeric("V")?
        .drop_missing("V")?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.rows()[1][0], Cell::Number(30.0));
    Ok(())
}

#[test]
fn scale_divides_and_rounds_to_two_decimals() -> anyhow::Result<()> {
    let rows = one_column(&["1,234,567", "—"])
        .normalize_numeric("V")?
        .scale("V", 1000.0)?;
    assert_eq!(rows.rows()[0][0], Cell::Number(1234.57));
    assert_eq!(rows.rows()[1][0], Cell::Missing);
    Ok(())
}

#[test]
fn scale_over_unnormalized_text_is_a_parse_failure() {
    let err = one_column(&["raw"]).scale("V", 1000.0).unwrap_err();
    assert!(matches!(err, EtlError::Parse(_)));
}

#[test]
fn convert_appends_rounded_derived_columns() -> anyhow::Result<()> {
    let rates = RateTable::from_pairs([("GBP", 0.8), ("EUR", 0.92)])?;
    let rows = one_column(&["100"]).normalize_numeric("V")?.convert(
        "V",
        &rates,
        &[
            ("MC_GBP".to_string(), "GBP".to_string()),
            ("MC_EUR".to_string(), "EUR".to_string()),
        ],
    )?;
    assert_eq!(rows.columns(), ["V", "MC_GBP", "MC_EUR"]);
    assert_eq!(rows.rows()[0][1], Cell::Number(80.0));
    assert_eq!(rows.rows()[0][2], Cell::Number(92.0));
    Ok(())
}

#[test]
fn convert_with_absent_code_fails_fast() -> anyhow::Result<()> {
    let rates = RateTable::from_pairs([("GBP", 0.8)])?;
    let err = one_column(&["100"])
        .normalize_numeric("V")?
        .convert("V", &rates, &[("MC_INR".to_string(), "INR".to_string())])
        .unwrap_err();
    match err {
        EtlError::MissingRate(code) => assert_eq!(code, "INR"),
        other => panic!("expected MissingRate, got {other:?}"),
    }
    Ok(())
}

#[test]
fn convert_propagates_missing_base_values() -> anyhow::Result<()> {
    let rates = RateTable::from_pairs([("GBP", 0.8)])?;
    let rows = one_column(&["—"]).normalize_numeric("V")?.convert(
        "V",
        &rates,
        &[("MC_GBP".to_string(), "GBP".to_string())],
    )?;
    assert_eq!(rows.rows()[0][1], Cell::Missing);
    Ok(())
}

#[test]
fn rename_relabels_without_touching_data() -> anyhow::Result<()> {
    let rows = one_column(&["7"]).rename_column("V", "Score")?;
    assert_eq!(rows.columns(), ["Score"]);
    assert_eq!(rows.rows()[0][0], Cell::text("7"));
    Ok(())
}

#[test]
fn rate_table_loads_from_a_delimited_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = write_rates_file(dir.path(), &[("GBP", 0.8), ("EUR", 0.93), ("INR", 82.95)])?;
    let rates = RateTable::from_path(&path)?;
    assert_eq!(rates.len(), 3);
    assert_eq!(rates.get("EUR"), Some(0.93));
    assert_eq!(rates.get("JPY"), None);
    Ok(())
}

#[test]
fn rate_table_rejects_non_positive_and_non_numeric_rates() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.csv");

    std::fs::write(&path, "Currency,Rate\nGBP,-0.8\n")?;
    assert!(matches!(RateTable::from_path(&path), Err(EtlError::Parse(_))));

    std::fs::write(&path, "Currency,Rate\nGBP,lots\n")?;
    assert!(matches!(RateTable::from_path(&path), Err(EtlError::Parse(_))));
    Ok(())
}

#[test]
fn rate_table_missing_file_is_a_parse_failure() {
    let err = RateTable::from_path("no/such/rates.csv").unwrap_err();
    assert!(matches!(err, EtlError::Parse(_)));
}
