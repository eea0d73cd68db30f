//! Header-aware CSV reader
//!
//! [`HeaderedReader`] takes the first row of a source as its column list and
//! turns every following row into a [`Record`] keyed by column name.
//!
//! ```rust
//! use csv_records::HeaderedReader;
//!
//! let mut reader = HeaderedReader::new("name,age\nJohn,30\nJane,25".as_bytes());
//! let records = reader.read_all().unwrap();
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[0]["name"], "John");
//! assert_eq!(records[1]["age"], "25");
//! ```

use crate::Record;
use crate::columns::Columns;
use crate::config::CsvConfig;
use crate::errors::{CsvError, CsvResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Lifecycle of a [`HeaderedReader`].
///
/// The reader only ever moves forward through these states. The column list
/// can be set only while the reader is `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No header has been read or set yet
    Uninitialized,
    /// The column list is known, no data row has been read
    HeaderRead,
    /// At least one data row has been read
    Reading,
    /// End of input was reached or a read failed
    Exhausted,
}

/// Reader that maps header columns onto each row of a CSV source
pub struct HeaderedReader<R> {
    inner: csv::Reader<R>,
    raw: csv::StringRecord,
    columns: Option<Columns>,
    state: ReaderState,
}

impl<R: Read> HeaderedReader<R> {
    /// Create a reader over `source` using the default configuration
    pub fn new(source: R) -> Self {
        Self::from_builder(&CsvConfig::default().reader_builder(), source)
    }

    /// Create a reader over `source` with the given configuration
    pub fn with_config(source: R, config: &CsvConfig) -> CsvResult<Self> {
        config.validate()?;
        Ok(Self::from_builder(&config.reader_builder(), source))
    }

    fn from_builder(builder: &csv::ReaderBuilder, source: R) -> Self {
        Self {
            inner: builder.from_reader(source),
            raw: csv::StringRecord::new(),
            columns: None,
            state: ReaderState::Uninitialized,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// The column list, once it has been read or set
    pub fn columns(&self) -> Option<&Columns> {
        self.columns.as_ref()
    }

    /// Line the codec has reached in the source (1-indexed)
    pub fn line(&self) -> u64 {
        self.inner.position().line()
    }

    /// Use `columns` as the header instead of reading one from the source.
    ///
    /// Meant for headerless sources: every row of the source is then data.
    /// Fails once a header has been read or set, or reading has started.
    pub fn set_columns(&mut self, columns: impl Into<Columns>) -> CsvResult<()> {
        if self.state != ReaderState::Uninitialized {
            return Err(CsvError::config(
                "column list can only be set before the first read",
            ));
        }
        let columns = columns.into();
        debug!(columns = ?columns.names(), "Using caller supplied CSV header");
        self.columns = Some(columns);
        self.state = ReaderState::HeaderRead;
        Ok(())
    }

    /// Read the next row of the source and keep it as the column list.
    ///
    /// Returns `Ok(None)` if the source holds no rows at all.
    pub fn read_header(&mut self) -> CsvResult<Option<Vec<String>>> {
        match self.state {
            ReaderState::Uninitialized => {}
            ReaderState::Exhausted if self.columns.is_none() => return Ok(None),
            _ => return Err(CsvError::config("CSV header has already been read")),
        }

        match self.inner.read_record(&mut self.raw) {
            Ok(true) => {
                let columns = Columns::new(self.raw.iter());
                let names = columns.names().to_vec();
                debug!(columns = ?names, "Read CSV header");
                self.columns = Some(columns);
                self.state = ReaderState::HeaderRead;
                Ok(Some(names))
            }
            Ok(false) => {
                debug!("CSV source is empty");
                self.state = ReaderState::Exhausted;
                Ok(None)
            }
            Err(e) => {
                let err = CsvError::from_read(e);
                warn!(error = %err, "Failed to read CSV header");
                self.state = ReaderState::Exhausted;
                Err(err)
            }
        }
    }

    /// Read one data row as a record.
    ///
    /// Reads the header first if none has been read or set. Returns `Ok(None)`
    /// at the end of the source. After an error the reader is exhausted.
    pub fn read_record(&mut self) -> CsvResult<Option<Record>> {
        match self.state {
            ReaderState::Uninitialized => {
                if self.read_header()?.is_none() {
                    return Ok(None);
                }
            }
            ReaderState::Exhausted => return Ok(None),
            ReaderState::HeaderRead | ReaderState::Reading => {}
        }

        let result = self.next_record();
        self.state = match &result {
            Ok(Some(_)) => ReaderState::Reading,
            Ok(None) => ReaderState::Exhausted,
            Err(err) => {
                warn!(error = %err, line = self.line(), "Failed to read CSV record");
                ReaderState::Exhausted
            }
        };
        result
    }

    fn next_record(&mut self) -> CsvResult<Option<Record>> {
        let Some(columns) = &self.columns else {
            return Ok(None);
        };

        match self.inner.read_record(&mut self.raw) {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => return Err(CsvError::from_read(e)),
        }

        // The codec only compares rows with each other, a caller supplied
        // header has to be checked here.
        if self.raw.len() != columns.len() {
            let line = self.raw.position().map_or(0, csv::Position::line);
            return Err(CsvError::field_count_mismatch(
                line,
                columns.len(),
                self.raw.len(),
            ));
        }
        columns.ensure_unique()?;

        let record = columns.zip(self.raw.iter());
        trace!(?record, "Read CSV record");
        Ok(Some(record))
    }

    /// Read every remaining row.
    ///
    /// An empty source and a source with only a header both give an empty
    /// vector. The first failing row aborts the call and the rows read before
    /// it are dropped.
    pub fn read_all(&mut self) -> CsvResult<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_record()? {
            records.push(record);
        }
        debug!(record_count = records.len(), "Finished reading CSV");
        Ok(records)
    }

    /// Iterate over the remaining rows
    pub fn records(&mut self) -> Records<'_, R> {
        Records { reader: self }
    }

    /// Unwrap the underlying source
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl HeaderedReader<File> {
    /// Open the file at `path` for reading
    pub fn from_path(path: impl AsRef<Path>, config: &CsvConfig) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::with_config(file, config)
    }
}

/// Iterator over the records of a [`HeaderedReader`].
///
/// Yields at most one error, after which it is finished.
pub struct Records<'r, R> {
    reader: &'r mut HeaderedReader<R>,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = CsvResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.read_record().transpose()
    }
}
