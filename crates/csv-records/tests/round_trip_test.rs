//! Integration test: records written by `HeaderedWriter` read back through
//! `HeaderedReader`.

use anyhow::{Context, Result};
use csv_records::{CsvConfig, CsvError, HeaderedReader, HeaderedWriter, Record, RecordTerminator};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn project(record: &Record, columns: &[&str]) -> Record {
    columns
        .iter()
        .map(|c| (c.to_string(), record.get(*c).cloned().unwrap_or_default()))
        .collect()
}

fn sample_records() -> Vec<Record> {
    vec![
        record(&[("id", "1"), ("name", "Widget"), ("note", "plain")]),
        record(&[("id", "2"), ("name", "Gadget, large"), ("extra", "dropped")]),
        record(&[("id", "3"), ("note", "line one\nline two")]),
        record(&[("name", "say \"hi\""), ("note", "")]),
    ]
}

fn round_trip(columns: &[&str], config: &CsvConfig) -> Result<()> {
    let records = sample_records();

    let mut output = Vec::new();
    {
        let mut writer = HeaderedWriter::with_config(&mut output, columns, config)?;
        writer.write_all(&records)?;
    }

    let mut reader = HeaderedReader::with_config(&output[..], config)?;
    let header = reader.read_header()?.context("header row missing")?;
    assert_eq!(header, columns);

    let read_back = reader.read_all()?;
    let expected: Vec<Record> = records.iter().map(|r| project(r, columns)).collect();
    assert_eq!(read_back, expected);
    Ok(())
}

#[test]
fn round_trip_with_default_config() -> Result<()> {
    round_trip(&["id", "name", "note"], &CsvConfig::default())
}

#[test]
fn round_trip_with_semicolon_and_crlf() -> Result<()> {
    let config = CsvConfig::new()
        .delimiter(';')
        .record_terminator(RecordTerminator::CRLF);
    round_trip(&["note", "id", "name", "missing"], &config)
}

#[test]
fn round_trip_with_tab_delimiter() -> Result<()> {
    round_trip(&["id", "name"], &CsvConfig::new().delimiter('\t'))
}

#[test]
fn every_row_has_one_field_per_column() -> Result<()> {
    let columns = ["a", "b", "c", "d"];
    let mut output = Vec::new();
    {
        let mut writer = HeaderedWriter::new(&mut output, &columns[..]);
        writer.write_all(&[record(&[("b", "x")]), Record::new()])?;
    }

    let text = String::from_utf8(output)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, ["a,b,c,d", ",x,,", ",,,"]);
    Ok(())
}

#[test]
fn file_round_trip() -> Result<()> {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH)?.as_nanos();
    let path: PathBuf = env::temp_dir().join(format!(
        "csv-records-{}-{nanos}.csv",
        std::process::id()
    ));
    let config = CsvConfig::new().delimiter('|');

    {
        let mut writer = HeaderedWriter::from_path(&path, &["id", "name"][..], &config)?;
        writer.write_all(&sample_records())?;
    }
    assert!(fs::read_to_string(&path)?.starts_with("id|name\n"));

    let mut reader = HeaderedReader::from_path(&path, &config)?;
    let records = reader.read_all()?;
    fs::remove_file(&path)?;

    assert_eq!(records.len(), 4);
    assert_eq!(records[1]["name"], "Gadget, large");
    assert_eq!(records[3]["id"], "");
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let path = env::temp_dir().join("csv-records-this-file-does-not-exist.csv");
    let err = HeaderedReader::from_path(&path, &CsvConfig::default())
        .err()
        .expect("opening a missing file should fail");
    assert!(matches!(err, CsvError::Io(_)));
}

#[test]
fn reading_with_wrong_delimiter_sees_one_column() -> Result<()> {
    let mut reader = HeaderedReader::new("a;b\n1;2\n".as_bytes());
    let records = reader.read_all()?;
    assert_eq!(records, vec![record(&[("a;b", "1;2")])]);
    Ok(())
}
