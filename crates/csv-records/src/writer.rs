//! Header-aware CSV writer

use crate::Record;
use crate::columns::Columns;
use crate::config::CsvConfig;
use crate::errors::{CsvError, CsvResult};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, trace, warn};

/// Whether a [`HeaderedWriter`] has emitted its header row yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    /// Nothing has been written
    NotStarted,
    /// The header row has been handed to the codec
    Started,
}

/// Writer that lays records out in a fixed column order.
///
/// The header row is written together with the first record, so a writer that
/// never receives a record leaves its sink untouched. Keys of a record that are
/// not columns are dropped, columns missing from a record are written empty.
pub struct HeaderedWriter<W: Write> {
    inner: csv::Writer<W>,
    columns: Columns,
    header: HeaderState,
    last_error: Option<CsvError>,
}

impl<W: Write> HeaderedWriter<W> {
    /// Create a writer with the default configuration
    pub fn new(sink: W, columns: impl Into<Columns>) -> Self {
        Self::from_builder(&CsvConfig::default().writer_builder(), sink, columns.into())
    }

    /// Create a writer with the given configuration
    pub fn with_config(
        sink: W,
        columns: impl Into<Columns>,
        config: &CsvConfig,
    ) -> CsvResult<Self> {
        config.validate()?;
        Ok(Self::from_builder(&config.writer_builder(), sink, columns.into()))
    }

    fn from_builder(builder: &csv::WriterBuilder, sink: W, columns: Columns) -> Self {
        Self {
            inner: builder.from_writer(sink),
            columns,
            header: HeaderState::NotStarted,
            last_error: None,
        }
    }

    /// The header columns, in output order
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Whether the header row has been emitted
    pub fn header_state(&self) -> HeaderState {
        self.header
    }

    fn write_header(&mut self) -> CsvResult<()> {
        self.header = HeaderState::Started;
        let result = self.inner.write_record(self.columns.names());
        debug!(columns = ?self.columns.names(), "Wrote CSV header");
        self.check(result)
    }

    /// Write one record, preceded by the header row on the first call
    pub fn write(&mut self, record: &Record) -> CsvResult<()> {
        if self.header == HeaderState::NotStarted {
            self.write_header()?;
        }

        let result = self.inner.write_record(self.columns.project(record));
        trace!(?record, "Wrote CSV row");
        self.check(result)
    }

    /// Write every record in order, then flush.
    ///
    /// Stops at the first record that fails; later records are not attempted.
    pub fn write_all<'a, I>(&mut self, records: I) -> CsvResult<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut count = 0usize;
        for record in records {
            self.write(record)?;
            count += 1;
        }
        self.flush()?;
        debug!(record_count = count, "Finished writing CSV");
        self.error()
    }

    /// Push buffered rows to the sink. Does nothing before the first write.
    pub fn flush(&mut self) -> CsvResult<()> {
        if self.header == HeaderState::NotStarted {
            return Ok(());
        }
        let result = self.inner.flush().map_err(CsvError::sink);
        self.remember(result)
    }

    /// The last error raised by a write or flush, if any
    pub fn error(&self) -> CsvResult<()> {
        match &self.last_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Flush and unwrap the underlying sink
    pub fn into_inner(self) -> CsvResult<W> {
        self.inner
            .into_inner()
            .map_err(|e| {
                let err = e.error();
                CsvError::sink(io::Error::new(err.kind(), err.to_string()))
            })
    }

    fn check(&mut self, result: csv::Result<()>) -> CsvResult<()> {
        let result = result.map_err(CsvError::from_write);
        self.remember(result)
    }

    fn remember(&mut self, result: CsvResult<()>) -> CsvResult<()> {
        if let Err(err) = &result {
            warn!(error = %err, "CSV write failed");
            self.last_error = Some(err.clone());
        }
        result
    }
}

impl HeaderedWriter<File> {
    /// Create (or truncate) the file at `path` for writing
    pub fn from_path(
        path: impl AsRef<Path>,
        columns: impl Into<Columns>,
        config: &CsvConfig,
    ) -> CsvResult<Self> {
        let file = File::create(path)?;
        Self::with_config(file, columns, config)
    }
}
