//! Order-independent comparison of expected and actual result tables.
//!
//! Both sides of a case are sorted into a canonical row order before anything
//! is compared, so neither the order rows come back from the database nor the
//! order they were declared in the script matters. Wildcard tokens on the
//! expected side relax individual cells.

use std::cmp::Ordering;
use std::fmt;

use crate::running::cases::TestCase;
use crate::Table;

/// Expected-side token matching any actual value at all.
pub const ANY: &str = "<K_ANY>";

/// Expected-side token matching any actual value except the null forms.
pub const ANY_NOT_NULL: &str = "<K_ANY_NOT_NULL>";

/// The shapes an SQL null takes once a result set has been stringified.
const NULL_FORMS: [&str; 4] = ["", "null", "NULL", "<nil>"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparingError {
    RowCount {
        expected: usize,
        actual: usize,
    },
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },
    NullUnderWildcard {
        row: usize,
        column: usize,
    },
    CellMismatch {
        row: usize,
        column: usize,
        expected: String,
        actual: String,
    },
}

impl ComparingError {
    pub fn message(&self) -> String {
        match self {
            ComparingError::RowCount { expected, actual } => {
                format!("different row count: expected {}, got {}", expected, actual)
            }
            ComparingError::ColumnCount {
                row,
                expected,
                actual,
            } => format!(
                "different column count in row {}: expected {}, got {}",
                row + 1,
                expected,
                actual
            ),
            ComparingError::NullUnderWildcard { row, column } => format!(
                "{} matched an empty or null value at row {}, column {}",
                ANY_NOT_NULL,
                row + 1,
                column + 1
            ),
            ComparingError::CellMismatch {
                row,
                column,
                expected,
                actual,
            } => format!(
                "mismatch at row {}, column {}: expected '{}', got '{}'",
                row + 1,
                column + 1,
                expected,
                actual
            ),
        }
    }
}

impl fmt::Display for ComparingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The canonical row order. The first index at which cells differ decides by
/// plain string comparison; if every cell up to the shorter row's length is
/// equal, the row with fewer cells sorts first.
fn compare_rows(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a
        .iter()
        .zip(b.iter())
    {
        match x.cmp(y) {
            Ordering::Equal => continue,
            decided => return decided,
        }
    }

    a.len()
        .cmp(&b.len())
}

/// Sort a table into the canonical row order.
pub fn sort_rows(table: &mut Table) {
    table.sort_by(|a, b| compare_rows(a, b));
}

/// Decide whether a case's actual output matches its declared expectation.
///
/// Both tables are sorted, their shapes are checked, wildcard cells on the
/// expected side neutralize the paired actual cells, and what remains must be
/// identical cell for cell. The error carries the first point of divergence.
pub fn verify(case: &TestCase) -> Result<(), ComparingError> {
    let mut expected = case
        .expected
        .clone();
    let mut actual = case
        .actual
        .clone();

    sort_rows(&mut expected);
    sort_rows(&mut actual);

    if expected.len() != actual.len() {
        return Err(ComparingError::RowCount {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (i, (expected_row, actual_row)) in expected
        .iter()
        .zip(actual.iter_mut())
        .enumerate()
    {
        if expected_row.len() != actual_row.len() {
            return Err(ComparingError::ColumnCount {
                row: i,
                expected: expected_row.len(),
                actual: actual_row.len(),
            });
        }

        for (j, (expected_cell, actual_cell)) in expected_row
            .iter()
            .zip(actual_row.iter_mut())
            .enumerate()
        {
            if expected_cell == ANY {
                *actual_cell = ANY.to_owned();
            } else if expected_cell == ANY_NOT_NULL {
                if NULL_FORMS.contains(&actual_cell.as_str()) {
                    return Err(ComparingError::NullUnderWildcard { row: i, column: j });
                }
                *actual_cell = ANY_NOT_NULL.to_owned();
            }
        }
    }

    for (i, (expected_row, actual_row)) in expected
        .iter()
        .zip(actual.iter())
        .enumerate()
    {
        for (j, (expected_cell, actual_cell)) in expected_row
            .iter()
            .zip(actual_row.iter())
            .enumerate()
        {
            if expected_cell != actual_cell {
                return Err(ComparingError::CellMismatch {
                    row: i,
                    column: j,
                    expected: expected_cell.clone(),
                    actual: actual_cell.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod check {
    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.to_string())
                    .collect()
            })
            .collect()
    }

    fn case(expected: Table, actual: Table) -> TestCase {
        TestCase {
            name: None,
            expected,
            actual,
        }
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut once = table(&[&["b", "2"], &["a", "1"], &["a", "0"]]);
        sort_rows(&mut once);

        let mut twice = once.clone();
        sort_rows(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn sorting_ignores_input_order() {
        let mut forward = table(&[&["a", "1"], &["b", "2"], &["c", "3"]]);
        let mut backward = table(&[&["c", "3"], &["b", "2"], &["a", "1"]]);

        sort_rows(&mut forward);
        sort_rows(&mut backward);

        assert_eq!(forward, backward);
    }

    #[test]
    fn shorter_row_sorts_first() {
        let mut rows = table(&[&["a", "1", "extra"], &["a", "1"]]);
        sort_rows(&mut rows);

        assert_eq!(rows, table(&[&["a", "1"], &["a", "1", "extra"]]));
    }

    #[test]
    fn first_differing_cell_decides() {
        let mut rows = table(&[&["a", "2"], &["a", "1"]]);
        sort_rows(&mut rows);

        assert_eq!(rows, table(&[&["a", "1"], &["a", "2"]]));
    }

    #[test]
    fn identical_tables_match() {
        let expected = table(&[&["1", "x"], &["2", "y"]]);
        let actual = expected.clone();

        assert_eq!(verify(&case(expected, actual)), Ok(()));
    }

    #[test]
    fn row_order_does_not_matter() {
        let expected = table(&[&["2", "y"], &["1", "x"]]);
        let actual = table(&[&["1", "x"], &["2", "y"]]);

        assert_eq!(verify(&case(expected, actual)), Ok(()));
    }

    #[test]
    fn row_count_mismatch() {
        let expected = table(&[&["1"]]);
        let actual = table(&[&["1"], &["2"]]);

        assert_eq!(
            verify(&case(expected, actual)),
            Err(ComparingError::RowCount {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn column_count_mismatch() {
        let expected = table(&[&["1", "x"]]);
        let actual = table(&[&["1"]]);

        assert_eq!(
            verify(&case(expected, actual)),
            Err(ComparingError::ColumnCount {
                row: 0,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn any_matches_everything() {
        let expected = table(&[&["1", ANY]]);

        for value in ["", "null", "<nil>", "surprise"] {
            let actual = table(&[&["1", value]]);
            assert_eq!(verify(&case(expected.clone(), actual)), Ok(()));
        }
    }

    #[test]
    fn any_not_null_rejects_null_forms() {
        let expected = table(&[&[ANY_NOT_NULL]]);

        for value in ["", "null", "NULL", "<nil>"] {
            let actual = table(&[&[value]]);
            assert_eq!(
                verify(&case(expected.clone(), actual)),
                Err(ComparingError::NullUnderWildcard { row: 0, column: 0 })
            );
        }
    }

    #[test]
    fn any_not_null_accepts_values() {
        let expected = table(&[&["1", ANY_NOT_NULL]]);
        let actual = table(&[&["1", "2024-05-01 09:30:00"]]);

        assert_eq!(verify(&case(expected, actual)), Ok(()));
    }

    #[test]
    fn mismatch_reports_first_divergence() {
        let expected = table(&[&["1", "x"], &["2", "y"]]);
        let actual = table(&[&["1", "x"], &["2", "z"]]);

        assert_eq!(
            verify(&case(expected, actual)),
            Err(ComparingError::CellMismatch {
                row: 1,
                column: 1,
                expected: "y".to_string(),
                actual: "z".to_string(),
            })
        );
    }

    #[test]
    fn comparison_happens_after_sorting() {
        // the mismatch position refers to the canonical order, not the
        // declared order
        let expected = table(&[&["b"], &["a"]]);
        let actual = table(&[&["a"], &["c"]]);

        assert_eq!(
            verify(&case(expected, actual)),
            Err(ComparingError::CellMismatch {
                row: 1,
                column: 0,
                expected: "b".to_string(),
                actual: "c".to_string(),
            })
        );
    }
}
