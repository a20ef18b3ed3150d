//! Rendering of result-set values into their canonical display strings.
//!
//! Comparison and wildcard rejection both work on exact text, so the mapping
//! from column type to string is closed and pinned here rather than left to
//! whatever a formatter happens to produce. A type outside the mapping is an
//! execution error, not a best-effort guess.

use tokio_postgres::row::Row;
use tokio_postgres::types::{FromSql, Type};

use crate::running::ExecutionError;

/// What an SQL null looks like once rendered.
pub const NULL: &str = "<nil>";

/// Render every column of a row to its display string.
pub fn row_to_strings(row: &Row) -> Result<Vec<String>, ExecutionError> {
    let mut cells = Vec::with_capacity(row.len());

    for (i, column) in row
        .columns()
        .iter()
        .enumerate()
    {
        let rendered = match *column.type_() {
            Type::BOOL => cell::<bool>(row, i)?.map(|v| v.to_string()),
            Type::CHAR => cell::<i8>(row, i)?.map(|v| v.to_string()),
            Type::BPCHAR | Type::NAME | Type::TEXT | Type::VARCHAR => cell::<String>(row, i)?,
            Type::INT2 => cell::<i16>(row, i)?.map(|v| v.to_string()),
            Type::INT4 => cell::<i32>(row, i)?.map(|v| v.to_string()),
            Type::INT8 => cell::<i64>(row, i)?.map(|v| v.to_string()),
            Type::OID => cell::<u32>(row, i)?.map(|v| v.to_string()),
            Type::FLOAT4 => cell::<f32>(row, i)?.map(|v| v.to_string()),
            Type::FLOAT8 => cell::<f64>(row, i)?.map(|v| v.to_string()),
            Type::TIMESTAMP => cell::<chrono::NaiveDateTime>(row, i)?.map(|v| v.to_string()),
            Type::TIMESTAMPTZ => {
                cell::<chrono::DateTime<chrono::Utc>>(row, i)?.map(|v| v.to_string())
            }
            Type::DATE => cell::<chrono::NaiveDate>(row, i)?.map(|v| v.to_string()),
            Type::TIME => cell::<chrono::NaiveTime>(row, i)?.map(|v| v.to_string()),
            Type::UUID => cell::<uuid::Uuid>(row, i)?.map(|v| v.to_string()),
            Type::JSON | Type::JSONB => cell::<serde_json::Value>(row, i)?.map(|v| v.to_string()),
            ref other => {
                return Err(ExecutionError {
                    problem: format!("unsupported column type {}", other),
                    details: format!("column '{}' of the result set", column.name()),
                });
            }
        };

        cells.push(rendered.unwrap_or_else(|| NULL.to_string()));
    }

    Ok(cells)
}

fn cell<'a, T: FromSql<'a>>(row: &'a Row, index: usize) -> Result<Option<T>, ExecutionError> {
    row.try_get(index)
        .map_err(|error| ExecutionError {
            problem: "unable to decode column".to_string(),
            details: error.to_string(),
        })
}
