//! Column lists shared by the reader and the writer

use crate::Record;
use crate::errors::{CsvError, CsvResult};
use std::collections::HashSet;

/// An ordered list of column names.
///
/// The first repeated name is found once, when the list is built, so that
/// readers do not have to rescan the header for every row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Columns {
    names: Vec<String>,
    duplicate: Option<String>,
}

impl Columns {
    /// Build a column list from header names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let duplicate = first_duplicate(&names).map(str::to_string);
        Self { names, duplicate }
    }

    /// Column names in header order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the list has no columns
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The first name that appears more than once, if any
    pub fn duplicate(&self) -> Option<&str> {
        self.duplicate.as_deref()
    }

    /// Fail with [`CsvError::DuplicateColumn`] if any name repeats
    pub fn ensure_unique(&self) -> CsvResult<()> {
        match &self.duplicate {
            Some(name) => Err(CsvError::duplicate_column(name.as_str())),
            None => Ok(()),
        }
    }

    /// Pair each column name with the field at the same position.
    ///
    /// Callers check the field count first; extra fields are ignored here.
    pub fn zip<'a, I>(&self, fields: I) -> Record
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.names
            .iter()
            .cloned()
            .zip(fields.into_iter().map(str::to_string))
            .collect()
    }

    /// Lay a record out in column order, empty string for missing keys
    pub fn project<'a>(&'a self, record: &'a Record) -> impl Iterator<Item = &'a str> + 'a {
        self.names
            .iter()
            .map(move |name| record.get(name).map_or("", String::as_str))
    }
}

impl From<Vec<String>> for Columns {
    fn from(names: Vec<String>) -> Self {
        Self::new(names)
    }
}

impl From<&[&str]> for Columns {
    fn from(names: &[&str]) -> Self {
        Self::new(names.iter().copied())
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}
