//! Text anchor location.
//!
//! Template fields carry no structural identifiers, so the fill steps find
//! them by the literal label text the template author typed. All locators
//! return the first match in document order and `None` on a miss; callers
//! skip their fill step silently when the anchor is absent.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::Table;

/// Week-number label pattern: "WEEK NO" with any (or no) whitespace
/// between the tokens, any case.
pub static WEEK_NO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)WEEK\s*NO").expect("regex is compile-time constant"));

/// Case-insensitive substring containment, the matching rule for all
/// simple label anchors.
#[must_use]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_uppercase().contains(&needle.to_uppercase())
}

/// Position of a cell within a table, by row and cell index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub cell: usize,
}

/// First cell (row-major scan) whose text contains `needle`.
#[must_use]
pub fn first_cell_containing(table: &Table, needle: &str) -> Option<CellRef> {
    for (row_idx, row) in table.rows.iter().enumerate() {
        for (cell_idx, cell) in row.cells.iter().enumerate() {
            if contains_ci(&cell.text(), needle) {
                return Some(CellRef {
                    row: row_idx,
                    cell: cell_idx,
                });
            }
        }
    }
    None
}

/// Index of the first row with any cell whose text contains `needle`.
#[must_use]
pub fn first_row_containing(table: &Table, needle: &str) -> Option<usize> {
    first_cell_containing(table, needle).map(|cell_ref| cell_ref.row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Cell, Paragraph, Row, Run};

    fn cell(text: &str) -> Cell {
        let mut cell = Cell::default();
        let mut p = Paragraph::default();
        p.push_run(Run::new(text));
        cell.push_paragraph(p);
        cell
    }

    fn table(rows: Vec<Vec<&str>>) -> Table {
        Table {
            properties: None,
            rows: rows
                .into_iter()
                .map(|cells| Row {
                    properties: None,
                    cells: cells.into_iter().map(cell).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn week_no_pattern_tolerates_whitespace_and_case() {
        assert!(WEEK_NO_PATTERN.is_match("WEEK NO: __"));
        assert!(WEEK_NO_PATTERN.is_match("week   no"));
        assert!(WEEK_NO_PATTERN.is_match("WEEKNO"));
        assert!(!WEEK_NO_PATTERN.is_match("WEEKLY REPORT"));
    }

    #[test]
    fn contains_ci_ignores_case() {
        assert!(contains_ci("for the Week Ending 2024", "FOR THE WEEK ENDING"));
        assert!(!contains_ci("TRAINING MODE", "WEEK ENDING"));
    }

    #[test]
    fn first_cell_containing_scans_row_major() {
        let table = table(vec![
            vec!["alpha", "DATE: here"],
            vec!["DATE: also here"],
        ]);
        assert_eq!(
            first_cell_containing(&table, "DATE:"),
            Some(CellRef { row: 0, cell: 1 })
        );
    }

    #[test]
    fn first_cell_containing_miss_is_none() {
        let table = table(vec![vec!["alpha", "beta"]]);
        assert_eq!(first_cell_containing(&table, "SIGNATURE OF TRAINEE"), None);
    }

    #[test]
    fn first_row_containing_returns_row_index() {
        let table = table(vec![
            vec!["header"],
            vec!["REMARKS AND CERTIFICATION"],
            vec!["body"],
        ]);
        assert_eq!(first_row_containing(&table, "REMARKS AND CERTIFICATION"), Some(1));
    }
}
