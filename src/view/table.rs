//! Table collaborators
//!
//! Filtering and sorting of rendered rows. Both work on row fragments, so
//! they never need to know which resource the rows came from.

use super::template::RowFragment;
use std::cmp::Ordering;

/// Case-insensitive substring filter over every cell of a row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    text: String,
}

impl TableFilter {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn pop(&mut self) {
        self.text.pop();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// True when any cell contains the filter text
    pub fn matches(&self, cells: &[String]) -> bool {
        if self.text.is_empty() {
            return true;
        }

        let needle = self.text.to_lowercase();
        cells
            .iter()
            .any(|cell| cell.to_lowercase().contains(&needle))
    }
}

/// Single-column sort state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSorter {
    column: Option<usize>,
    descending: bool,
}

impl TableSorter {
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    pub fn is_ascending(&self) -> bool {
        !self.descending
    }

    /// Sort by `column`; selecting the active column again flips direction
    pub fn sort_by_column(&mut self, column: usize) {
        if self.column == Some(column) {
            self.descending = !self.descending;
        } else {
            self.column = Some(column);
            self.descending = false;
        }
    }

    /// Back to response order
    pub fn clear(&mut self) {
        self.column = None;
        self.descending = false;
    }

    /// Stable sort of `rows` by the active column
    pub fn apply(&self, rows: &mut [RowFragment]) {
        let Some(column) = self.column else {
            return;
        };

        rows.sort_by(|a, b| {
            let cmp = compare_cells(
                a.cells.get(column).map(String::as_str).unwrap_or(""),
                b.cells.get(column).map(String::as_str).unwrap_or(""),
            );
            if self.descending {
                cmp.reverse()
            } else {
                cmp
            }
        });
    }
}

/// Numbers compare numerically and sort before text; text compares bytewise
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(na), Ok(nb)) => na.total_cmp(&nb).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}
