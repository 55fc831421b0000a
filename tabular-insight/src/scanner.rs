//! Streaming, cap-aware reads of the active dataset.
//!
//! A [`DatasetScanner`] opens one file, reads the header row as column names
//! and then hands out rows one at a time until the file ends or the row cap
//! for the issuing query is reached. Rows are borrowed views over the raw
//! record bytes: a cell is only decoded when a caller asks for it, so rows a
//! query skips cost a record read and nothing more.
//!
//! Decoding is lenient. Invalid UTF-8 sequences are dropped from the cell
//! rather than failing the scan, and rows shorter than the header read as
//! empty strings in their missing cells.

use std::fs::File;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::dataset::DatasetHandle;
use crate::error::{InsightError, Result};

/// Decodes a cell, dropping invalid UTF-8 sequences.
pub fn decode_lenient(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.utf8_chunks().map(|chunk| chunk.valid()).collect(),
    }
}

/// Row-by-row reader over one dataset file.
pub struct DatasetScanner {
    reader: csv::Reader<File>,
    record: csv::ByteRecord,
    columns: Arc<[String]>,
    cap: Option<usize>,
    rows_read: usize,
    cap_reached: bool,
}

impl std::fmt::Debug for DatasetScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetScanner")
            .field("columns", &self.columns)
            .field("cap", &self.cap)
            .field("rows_read", &self.rows_read)
            .finish()
    }
}

impl DatasetScanner {
    /// Opens the file behind `handle` and reads its header row.
    ///
    /// `cap` bounds the number of data rows the scanner yields; `None` reads
    /// the whole file.
    ///
    /// # Errors
    ///
    /// [`InsightError::DatasetUnavailable`] if the file cannot be opened, and
    /// [`InsightError::Csv`] if the header row cannot be read.
    pub fn open(handle: &DatasetHandle, cap: Option<usize>) -> Result<Self> {
        let file = File::open(handle.path())
            .map_err(|e| InsightError::dataset_unavailable(handle.path(), e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let columns: Arc<[String]> = reader
            .byte_headers()?
            .iter()
            .map(decode_lenient)
            .collect();

        debug!(
            path = %handle.path().display(),
            mode = %handle.mode,
            columns = columns.len(),
            cap = ?cap,
            "Opened dataset scan"
        );

        Ok(Self {
            reader,
            record: csv::ByteRecord::new(),
            columns,
            cap,
            rows_read: 0,
            cap_reached: false,
        })
    }

    /// Column names from the header row, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Shared handle to the column names, for rows that outlive the scan.
    pub fn shared_columns(&self) -> Arc<[String]> {
        Arc::clone(&self.columns)
    }

    /// Index of the column called `name`.
    ///
    /// When the header repeats a name, the last occurrence wins.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().rposition(|column| column == name)
    }

    /// Number of data rows yielded so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// True once the scan stopped because of its row cap.
    pub fn cap_reached(&self) -> bool {
        self.cap_reached
    }

    /// Advances to the next row within the cap.
    ///
    /// Returns `Ok(None)` at the end of the file or once the cap is reached.
    pub fn next_row(&mut self) -> Result<Option<RawRow<'_>>> {
        if let Some(cap) = self.cap {
            if self.rows_read >= cap {
                if !self.cap_reached {
                    self.cap_reached = true;
                    debug!(cap, "Row cap reached, stopping scan");
                }
                return Ok(None);
            }
        }

        if !self.reader.read_byte_record(&mut self.record)? {
            return Ok(None);
        }
        self.rows_read += 1;

        Ok(Some(RawRow {
            record: &self.record,
            width: self.columns.len(),
        }))
    }
}

/// Borrowed view of the current row.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    record: &'a csv::ByteRecord,
    width: usize,
}

impl<'a> RawRow<'a> {
    /// Raw bytes of the cell at `index`, or `None` past the end of a short row.
    pub fn bytes(&self, index: usize) -> Option<&'a [u8]> {
        self.record.get(index)
    }

    /// Decoded cell at `index`; absent cells read as `""`.
    pub fn get(&self, index: usize) -> String {
        self.bytes(index).map(decode_lenient).unwrap_or_default()
    }

    /// Decodes every header-aligned cell into an owned [`Row`].
    ///
    /// Cells beyond the header width are discarded.
    pub fn to_row(&self, columns: &Arc<[String]>) -> Row {
        Row {
            columns: Arc::clone(columns),
            values: (0..self.width).map(|index| self.get(index)).collect(),
        }
    }
}

/// One decoded row, aligned with its column names.
///
/// Serializes as a map from column name to value in column order. A name
/// repeated in the header maps to the value of its last occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    /// Builds a row from parallel column names and values.
    ///
    /// Values are padded with `""` or truncated to the number of columns.
    pub fn new(columns: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(columns.len(), String::new());
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of the column called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .rposition(|column| column == name)
            .map(|index| self.values[index].as_str())
    }

    /// Column-value pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let distinct: Vec<(usize, &String)> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(index, name)| {
                !self.columns[..*index].iter().any(|earlier| earlier == *name)
            })
            .collect();

        let mut map = serializer.serialize_map(Some(distinct.len()))?;
        for (_, name) in distinct {
            map.serialize_entry(name, self.get(name).unwrap_or_default())?;
        }
        map.end()
    }
}
