use serde::Serialize;
use tracing::{debug, instrument};

use super::QueryContext;
use crate::dataset::ScanPurpose;
use crate::error::Result;
use crate::scanner::Row;

/// A page of raw rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub offset: usize,
    pub limit: usize,
}

impl QueryContext {
    /// Returns up to `limit` rows starting at row `offset` of the capped scan.
    ///
    /// Rows before `offset` are read but never decoded. An offset at or past
    /// the cap yields the columns and no rows.
    #[instrument(skip(self), fields(mode = %self.handle().mode))]
    pub fn read_preview(&self, offset: usize, limit: usize) -> Result<Preview> {
        let mut scanner = self.open_scan(ScanPurpose::Preview)?;
        let columns = scanner.shared_columns();
        let mut rows = Vec::with_capacity(limit.min(1024));

        let mut index = 0usize;
        while rows.len() < limit {
            let Some(raw) = scanner.next_row()? else {
                break;
            };
            if index >= offset {
                rows.push(raw.to_row(&columns));
            }
            index += 1;
        }

        debug!(
            rows = rows.len(),
            scanned = scanner.rows_read(),
            "Preview complete"
        );

        Ok(Preview {
            columns: columns.to_vec(),
            rows,
            offset,
            limit,
        })
    }
}
