use rowforge::{fetch_rows, replace_table, upsert_observation, Cell, Observation, RowSet};
use rusqlite::types::Value;
use rusqlite::Connection;

fn sample() -> RowSet {
    RowSet::from_rows(
        vec!["Name".into(), "Value".into()],
        vec![
            vec![Cell::text("Bank A"), Cell::Number(80.0)],
            vec![Cell::text("Bank B"), Cell::Missing],
        ],
    )
}

fn observation(observed: i64) -> Observation {
    Observation {
        year: 2024,
        month: 1,
        day: 1,
        observed,
        forecast: 18,
        captured_at: "2024-01-01T09:00:00+00:00".into(),
    }
}

#[test]
fn replace_table_loads_the_full_rowset() -> anyhow::Result<()> {
    let mut conn = Connection::open_in_memory()?;
    let loaded = replace_table(&mut conn, "largest_banks", &sample())?;
    assert_eq!(loaded, 2);
    let rows = fetch_rows(&conn, "largest_banks")?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], Value::Text("Bank A".into()));
    assert_eq!(rows[0][1], Value::Real(80.0));
    assert_eq!(rows[1][1], Value::Null);
    Ok(())
}

#[test]
fn replace_table_twice_leaves_identical_content() -> anyhow::Result<()> {
    let mut conn = Connection::open_in_memory()?;
    replace_table(&mut conn, "largest_banks", &sample())?;
    let first = fetch_rows(&conn, "largest_banks")?;
    replace_table(&mut conn, "largest_banks", &sample())?;
    let second = fetch_rows(&conn, "largest_banks")?;
    assert_eq!(first, second);
    assert_eq!(second.len(), 2);
    Ok(())
}

#[test]
fn replace_table_discards_rows_from_a_prior_snapshot() -> anyhow::Result<()> {
    let mut conn = Connection::open_in_memory()?;
    replace_table(&mut conn, "t", &sample())?;
    let shrunk = RowSet::from_rows(
        vec!["Name".into(), "Value".into()],
        vec![vec![Cell::text("Only"), Cell::Number(1.5)]],
    );
    replace_table(&mut conn, "t", &shrunk)?;
    let rows = fetch_rows(&conn, "t")?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Value::Text("Only".into()));
    Ok(())
}

#[test]
fn numeric_columns_get_real_affinity() -> anyhow::Result<()> {
    let mut conn = Connection::open_in_memory()?;
    replace_table(&mut conn, "t", &sample())?;
    let decl: String = conn.query_row(
        "SELECT type FROM pragma_table_info('t') WHERE name = 'Value'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(decl, "REAL");
    let name_decl: String = conn.query_row(
        "SELECT type FROM pragma_table_info('t') WHERE name = 'Name'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(name_decl, "TEXT");
    Ok(())
}

#[test]
fn upsert_inserts_then_replaces_by_natural_key() -> anyhow::Result<()> {
    let conn = Connection::open_in_memory()?;
    upsert_observation(&conn, "weather_reports", &observation(21))?;
    upsert_observation(&conn, "weather_reports", &observation(23))?;

    let (count, observed): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), MAX(observed) FROM weather_reports",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    assert_eq!(count, 1);
    assert_eq!(observed, 23);
    Ok(())
}

#[test]
fn upsert_keeps_distinct_days_apart() -> anyhow::Result<()> {
    let conn = Connection::open_in_memory()?;
    upsert_observation(&conn, "weather_reports", &observation(21))?;
    let mut next_day = observation(19);
    next_day.day = 2;
    upsert_observation(&conn, "weather_reports", &next_day)?;

    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM weather_reports", [], |row| row.get(0))?;
    assert_eq!(count, 2);
    Ok(())
}

#[test]
fn quoted_identifiers_survive_awkward_table_names() -> anyhow::Result<()> {
    let mut conn = Connection::open_in_memory()?;
    replace_table(&mut conn, "Countries_by_GDP", &sample())?;
    assert_eq!(fetch_rows(&conn, "Countries_by_GDP")?.len(), 2);
    Ok(())
}
