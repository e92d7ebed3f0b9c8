//! Read-only view of a decoded worksheet.
//!
//! Rows are 1-based so that row 1 is the header row and `cell(1, 0)` is A1.
//! Columns are 0-based. Decoding happens in the IO layer; the engine only
//! ever sees cell text.

/// Cell-level access to a decoded sheet.
pub trait SheetSource {
    /// Text of the cell at (row, col), or `None` when absent or empty.
    fn cell(&self, row: u32, col: usize) -> Option<String>;

    /// Last row that holds data (1-based). Zero for an empty sheet.
    fn row_count(&self) -> u32;

    /// Number of columns in the widest row.
    fn column_count(&self) -> usize;

    /// First row's values, trimmed. Absent cells become empty strings.
    fn header_row(&self) -> Vec<String> {
        (0..self.column_count())
            .map(|col| self.cell(1, col).map(|v| v.trim().to_string()).unwrap_or_default())
            .collect()
    }
}

impl<S: SheetSource + ?Sized> SheetSource for &S {
    fn cell(&self, row: u32, col: usize) -> Option<String> {
        (**self).cell(row, col)
    }

    fn row_count(&self) -> u32 {
        (**self).row_count()
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }
}

impl<S: SheetSource + ?Sized> SheetSource for Box<S> {
    fn cell(&self, row: u32, col: usize) -> Option<String> {
        (**self).cell(row, col)
    }

    fn row_count(&self) -> u32 {
        (**self).row_count()
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }
}

/// In-memory grid, row-major. Used by CSV import and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridSheet {
    rows: Vec<Vec<Option<String>>>,
}

impl GridSheet {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Build from plain strings; empty strings become absent cells.
    pub fn from_strings<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| {
                        let s: String = cell.into();
                        if s.is_empty() { None } else { Some(s) }
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }
}

impl SheetSource for GridSheet {
    fn cell(&self, row: u32, col: usize) -> Option<String> {
        if row == 0 {
            return None;
        }
        self.rows
            .get(row as usize - 1)
            .and_then(|r| r.get(col))
            .and_then(|c| c.clone())
            .filter(|c| !c.is_empty())
    }

    fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_rows() {
        let sheet = GridSheet::from_strings(vec![vec!["A1", "B1"], vec!["A2", ""]]);
        assert_eq!(sheet.cell(1, 0).as_deref(), Some("A1"));
        assert_eq!(sheet.cell(2, 0).as_deref(), Some("A2"));
        assert_eq!(sheet.cell(2, 1), None);
        assert_eq!(sheet.cell(0, 0), None);
        assert_eq!(sheet.cell(3, 0), None);
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn header_row_is_trimmed_and_padded() {
        let sheet = GridSheet::from_strings(vec![vec![" OrdId ", "", "Qty"], vec!["1", "2", "3", "4"]]);
        assert_eq!(sheet.header_row(), vec!["OrdId", "", "Qty", ""]);
    }

    #[test]
    fn empty_sheet() {
        let sheet = GridSheet::default();
        assert_eq!(sheet.row_count(), 0);
        assert!(sheet.header_row().is_empty());
    }
}
