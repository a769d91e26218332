//! Delimited-text ingestion.
//!
//! Comma-separated values with an optional header row. The first data row
//! fixes the column count; every subsequent row must match it and every cell
//! must parse as a number.

use crate::data::Scalar;
use crate::data::matrix::Matrix;
use crate::data::variable::VariableRegistry;
use crate::error::{EngineError, EngineResult};

/// Parsed table: column names plus column-major values.
#[derive(Debug)]
pub(crate) struct CsvTable {
    pub(crate) names: Vec<String>,
    pub(crate) matrix: Matrix<'static>,
}

/// Parse delimited text into a column-major table.
///
/// Blank lines are skipped. With `has_header` the first non-blank line
/// supplies the column names; otherwise names are generated as `X1..Xn`.
pub(crate) fn parse(text: &str, has_header: bool) -> EngineResult<CsvTable> {
    let mut names: Option<Vec<String>> = None;
    let mut columns: Vec<Vec<Scalar>> = Vec::new();
    let mut cols = 0usize;

    for (line_index, line) in text.lines().enumerate() {
        let line_no = line_index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();

        if has_header && names.is_none() {
            if cells.iter().any(|c| c.is_empty()) {
                return Err(EngineError::Format {
                    line: line_no,
                    message: "empty column name in header".to_string(),
                });
            }
            names = Some(cells.iter().map(ToString::to_string).collect());
            continue;
        }

        if columns.is_empty() {
            cols = cells.len();
            if let Some(header) = &names {
                if header.len() != cols {
                    return Err(EngineError::Format {
                        line: line_no,
                        message: format!(
                            "expected {} columns to match the header, found {}",
                            header.len(),
                            cols
                        ),
                    });
                }
            }
            columns = vec![Vec::new(); cols];
        } else if cells.len() != cols {
            return Err(EngineError::Format {
                line: line_no,
                message: format!("expected {cols} columns, found {}", cells.len()),
            });
        }

        for (cell, column) in cells.iter().zip(&mut columns) {
            let value: Scalar = cell.parse().map_err(|_| EngineError::Format {
                line: line_no,
                message: format!("non-numeric cell {cell:?}"),
            })?;
            column.push(value);
        }
    }

    if columns.is_empty() {
        return Err(EngineError::Format {
            line: 1,
            message: "no data rows".to_string(),
        });
    }

    let matrix = Matrix::from_columns(&columns)?;
    let names = names.unwrap_or_else(|| VariableRegistry::default_names(cols));
    Ok(CsvTable { names, matrix })
}
