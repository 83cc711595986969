//! In-memory tabular representation shared by every pipeline stage.
//!
//! A [`Grid`] is an ordered header row plus ordered data rows of string
//! cells, positionally aligned. Column positions are always derived from the
//! current headers rather than cached, because the injection stage changes
//! the header shape and a stale index would silently misalign every later
//! read.

use anyhow::{Result, anyhow, ensure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by its current header name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like [`Grid::index_of`] but aborts the transform when the column is
    /// missing, so positional reads never run against an absent column.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| anyhow!("Required column '{name}' not found in headers"))
    }

    /// Fails fast when any row is narrower or wider than the header row.
    pub fn ensure_rectangular(&self) -> Result<()> {
        let expected = self.headers.len();
        for (idx, row) in self.rows.iter().enumerate() {
            ensure!(
                row.len() == expected,
                "Row {} has {} cell(s) but headers define {} column(s)",
                idx + 1,
                row.len(),
                expected
            );
        }
        Ok(())
    }
}

/// Emptiness rule used for the Published cell and option cells. Mirrors the
/// source data's convention where a whitespace-only cell counts as absent.
pub fn is_blank(cell: &str) -> bool {
    cell.trim().is_empty()
}
