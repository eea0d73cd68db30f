//! CSV configuration options
//!
//! A [`CsvConfig`] is handed to a reader or writer when it is constructed and
//! cannot be changed afterwards, so the delimiter used for the first row is the
//! delimiter used for every row.

use crate::errors::{CsvError, CsvResult};
use serde::{Deserialize, Serialize};

/// Configuration for CSV reading and writing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Field delimiter character (default: comma)
    pub delimiter: char,
    /// Quote character for fields containing special characters (default: double quote)
    pub quote_char: char,
    /// Escape character for escaping quotes (default: quotes are doubled)
    pub escape_char: Option<char>,
    /// Lines starting with this character are skipped when reading
    pub comment_char: Option<char>,
    /// Trim surrounding whitespace from fields when reading
    pub trim: bool,
    /// Record terminator used when writing (default: LF)
    pub record_terminator: RecordTerminator,
}

/// Record terminator for writing CSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordTerminator {
    /// LF (Unix-style)
    LF,
    /// CRLF (Windows-style, RFC 4180)
    CRLF,
}

impl RecordTerminator {
    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            RecordTerminator::LF => csv::Terminator::Any(b'\n'),
            RecordTerminator::CRLF => csv::Terminator::CRLF,
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote_char: '"',
            escape_char: None,
            comment_char: None,
            trim: false,
            record_terminator: RecordTerminator::LF,
        }
    }
}

impl CsvConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter character
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the quote character
    pub fn quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    /// Set the escape character
    pub fn escape_char(mut self, escape_char: char) -> Self {
        self.escape_char = Some(escape_char);
        self
    }

    /// Skip lines starting with `comment_char` when reading
    pub fn comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = Some(comment_char);
        self
    }

    /// Trim whitespace around fields when reading
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Set record terminator
    pub fn record_terminator(mut self, terminator: RecordTerminator) -> Self {
        self.record_terminator = terminator;
        self
    }

    /// Shorthand for `record_terminator(RecordTerminator::CRLF)`
    pub fn use_crlf(self, use_crlf: bool) -> Self {
        let terminator = if use_crlf {
            RecordTerminator::CRLF
        } else {
            RecordTerminator::LF
        };
        self.record_terminator(terminator)
    }

    /// Check that every configured character fits in a single byte.
    ///
    /// The codec works on bytes, so multi-byte delimiters cannot be honoured.
    pub fn validate(&self) -> CsvResult<()> {
        ensure_ascii("delimiter", self.delimiter)?;
        ensure_ascii("quote_char", self.quote_char)?;
        if let Some(c) = self.escape_char {
            ensure_ascii("escape_char", c)?;
        }
        if let Some(c) = self.comment_char {
            ensure_ascii("comment_char", c)?;
        }
        if self.delimiter == self.quote_char {
            return Err(CsvError::config(format!(
                "delimiter and quote_char must differ, both are {:?}",
                self.delimiter
            )));
        }
        if matches!(self.delimiter, '\r' | '\n') {
            return Err(CsvError::config("delimiter cannot be a line terminator"));
        }
        Ok(())
    }

    /// Delimiter as the byte the csv crate expects; valid after `validate`
    pub(crate) fn delimiter_u8(&self) -> u8 {
        self.delimiter as u8
    }

    /// Quote character as a byte; valid after `validate`
    pub(crate) fn quote_char_u8(&self) -> u8 {
        self.quote_char as u8
    }

    /// Codec settings for reading. Call [`CsvConfig::validate`] first.
    pub(crate) fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(false)
            .delimiter(self.delimiter_u8())
            .quote(self.quote_char_u8())
            .comment(self.comment_char.map(|c| c as u8))
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            });
        if let Some(escape) = self.escape_char {
            builder.escape(Some(escape as u8)).double_quote(false);
        }
        builder
    }

    /// Codec settings for writing. Call [`CsvConfig::validate`] first.
    pub(crate) fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter_u8())
            .quote(self.quote_char_u8())
            .terminator(self.record_terminator.to_csv());
        if let Some(escape) = self.escape_char {
            builder.escape(escape as u8).double_quote(false);
        }
        builder
    }
}

fn ensure_ascii(field: &str, c: char) -> CsvResult<()> {
    if c.is_ascii() {
        Ok(())
    } else {
        Err(CsvError::config(format!(
            "{field} must be a single ASCII character, got {c:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CsvConfig::default();
        assert_eq!(config.delimiter, ',');
        assert_eq!(config.quote_char, '"');
        assert_eq!(config.escape_char, None);
        assert_eq!(config.comment_char, None);
        assert!(!config.trim);
        assert_eq!(config.record_terminator, RecordTerminator::LF);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = CsvConfig::new()
            .delimiter(';')
            .quote_char('\'')
            .escape_char('\\')
            .comment_char('#')
            .trim(true)
            .record_terminator(RecordTerminator::CRLF);

        assert_eq!(config.delimiter, ';');
        assert_eq!(config.quote_char, '\'');
        assert_eq!(config.escape_char, Some('\\'));
        assert_eq!(config.comment_char, Some('#'));
        assert!(config.trim);
        assert_eq!(config.record_terminator, RecordTerminator::CRLF);
    }

    #[test]
    fn test_use_crlf() {
        assert_eq!(
            CsvConfig::new().use_crlf(true).record_terminator,
            RecordTerminator::CRLF
        );
        assert_eq!(
            CsvConfig::new().use_crlf(false).record_terminator,
            RecordTerminator::LF
        );
    }

    #[test]
    fn test_config_conversions() {
        let config = CsvConfig::new()
            .delimiter('\t')
            .quote_char('\'')
            .escape_char('\\');

        assert_eq!(config.delimiter_u8(), b'\t');
        assert_eq!(config.quote_char_u8(), b'\'');
    }

    #[test]
    fn test_escape_char_is_used_by_reader() {
        let config = CsvConfig::new().escape_char('\\');
        let mut rdr = config.reader_builder().from_reader(r#""say \"hi\"""#.as_bytes());
        let mut record = csv::StringRecord::new();
        assert!(rdr.read_record(&mut record).unwrap());
        assert_eq!(&record[0], "say \"hi\"");
    }

    #[test]
    fn test_validate_rejects_non_ascii_delimiter() {
        let err = CsvConfig::new().delimiter('§').validate().unwrap_err();
        assert!(matches!(err, CsvError::Config(_)));
        assert!(err.to_string().contains("delimiter"));
    }

    #[test]
    fn test_validate_rejects_delimiter_equal_to_quote() {
        let err = CsvConfig::new().delimiter('"').validate().unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn test_validate_rejects_newline_delimiter() {
        assert!(CsvConfig::new().delimiter('\n').validate().is_err());
    }

    #[test]
    fn test_config_from_yaml_uses_defaults_for_missing_keys() {
        let config: CsvConfig =
            serde_yaml::from_str("delimiter: '|'\nrecord_terminator: crlf\n").unwrap();
        assert_eq!(config.delimiter, '|');
        assert_eq!(config.quote_char, '"');
        assert_eq!(config.record_terminator, RecordTerminator::CRLF);
    }
}
