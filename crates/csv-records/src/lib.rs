//! # csv-records
//!
//! Header-aware record reading and writing for delimited text.
//!
//! A [`HeaderedReader`] turns each row of a CSV source into a [`Record`] keyed
//! by the names in the header row. A [`HeaderedWriter`] does the reverse: it
//! lays records out in the order of a fixed column list and writes the header
//! row before the first record. Quoting and escaping are left to the `csv`
//! crate.
//!
//! ## Example Usage
//!
//! ```rust
//! use csv_records::{CsvConfig, HeaderedReader, HeaderedWriter, Record};
//!
//! let config = CsvConfig::new().delimiter(';');
//!
//! let mut record = Record::new();
//! record.insert("name".to_string(), "John".to_string());
//!
//! let mut output = Vec::new();
//! let mut writer = HeaderedWriter::with_config(&mut output, &["name", "age"][..], &config).unwrap();
//! writer.write_all([&record]).unwrap();
//! drop(writer);
//! assert_eq!(output, b"name;age\nJohn;\n");
//!
//! let mut reader = HeaderedReader::with_config(&output[..], &config).unwrap();
//! let records = reader.read_all().unwrap();
//! assert_eq!(records[0]["name"], "John");
//! assert_eq!(records[0]["age"], "");
//! ```

pub mod columns;
pub mod config;
pub mod errors;
pub mod reader;
pub mod writer;

use std::collections::HashMap;

// Re-export main types
pub use columns::Columns;
pub use config::{CsvConfig, RecordTerminator};
pub use errors::{CsvError, CsvResult, SharedError};
pub use reader::{HeaderedReader, ReaderState, Records};
pub use writer::{HeaderState, HeaderedWriter};

/// One row, keyed by column name
pub type Record = HashMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_end_to_end_read_write() {
        let records = vec![
            record(&[("name", "John"), ("age", "30"), ("city", "Oslo")]),
            record(&[("name", "Jane")]),
        ];

        let mut output = Vec::new();
        {
            let mut writer = HeaderedWriter::new(&mut output, &["name", "age"][..]);
            writer.write_all(&records).unwrap();
        }

        let mut reader = HeaderedReader::new(&output[..]);
        let read_back = reader.read_all().unwrap();
        assert_eq!(
            read_back,
            vec![
                record(&[("name", "John"), ("age", "30")]),
                record(&[("name", "Jane"), ("age", "")]),
            ]
        );
    }
}
