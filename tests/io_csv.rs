use std::fs;

use rowforge::{append_row, write_rowset, Cell, RowSet, WriteMode};

fn sample() -> RowSet {
    RowSet::from_rows(
        vec!["Name".into(), "Value".into()],
        vec![
            vec![Cell::text("Bank A"), Cell::Number(80.0)],
            vec![Cell::text("Bank B"), Cell::Number(40.4)],
            vec![Cell::text("Bank C"), Cell::Missing],
        ],
    )
}

#[test]
fn overwrite_produces_exactly_the_current_rowset() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    let written = write_rowset(&path, &sample(), WriteMode::Overwrite, b',')?;
    assert_eq!(written, 3);
    let contents = fs::read_to_string(&path)?;
    assert_eq!(contents, "Name,Value\nBank A,80.0\nBank B,40.4\nBank C,\n");
    Ok(())
}

#[test]
fn overwrite_twice_is_byte_identical() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    write_rowset(&path, &sample(), WriteMode::Overwrite, b',')?;
    let first = fs::read(&path)?;
    write_rowset(&path, &sample(), WriteMode::Overwrite, b',')?;
    let second = fs::read(&path)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn overwrite_leaves_no_trace_of_a_larger_prior_run() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.csv");
    write_rowset(&path, &sample(), WriteMode::Overwrite, b',')?;
    let smaller = RowSet::from_rows(
        vec!["Name".into(), "Value".into()],
        vec![vec![Cell::text("Solo"), Cell::Number(1.0)]],
    );
    write_rowset(&path, &smaller, WriteMode::Overwrite, b',')?;
    assert_eq!(fs::read_to_string(&path)?, "Name,Value\nSolo,1.0\n");
    Ok(())
}

#[test]
fn append_writes_the_header_exactly_once() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("log.tsv");
    let header = ["year", "month", "day"];
    append_row(&path, &header, &["2024".into(), "1".into(), "1".into()], b'\t')?;
    append_row(&path, &header, &["2024".into(), "1".into(), "2".into()], b'\t')?;
    let contents = fs::read_to_string(&path)?;
    assert_eq!(contents, "year\tmonth\tday\n2024\t1\t1\n2024\t1\t2\n");
    Ok(())
}

#[test]
fn append_mode_extends_a_rowset_log() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("log.tsv");
    write_rowset(&path, &sample(), WriteMode::Append, b'\t')?;
    write_rowset(&path, &sample(), WriteMode::Append, b'\t')?;
    let contents = fs::read_to_string(&path)?;
    assert_eq!(contents.lines().count(), 7);
    assert!(contents.starts_with("Name\tValue\n"));
    Ok(())
}

#[test]
fn parent_directories_are_created_for_the_sink() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested/deep/out.csv");
    write_rowset(&path, &sample(), WriteMode::Overwrite, b',')?;
    assert!(path.exists());
    Ok(())
}
