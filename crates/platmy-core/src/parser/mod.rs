//! Whitespace-delimited numeric text shared by the solver's input and output
//! files.
//!
//! Blank lines and `#` comment lines are skipped. Fortran `D` exponents are
//! accepted. Every data row must have the width of the first one.

use crate::domain::{ParserResult, PlatmyError};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericMatrix {
    rows: Vec<Vec<f64>>,
    width: usize,
}

impl NumericMatrix {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of values per row, zero for a matrix without rows.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn column(&self, index: usize) -> Option<Vec<f64>> {
        if self.rows.is_empty() || index >= self.width {
            return None;
        }
        Some(self.rows.iter().map(|row| row[index]).collect())
    }
}

/// Parses `(line_number, text)` pairs into a rectangular matrix.
///
/// `artifact` only names the source in error messages.
pub fn parse_numeric_matrix<'a, I>(lines: I, artifact: &str) -> ParserResult<NumericMatrix>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let mut rows = Vec::new();
    let mut width = None;

    for (line_number, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let row = trimmed
            .split_whitespace()
            .map(|token| {
                parse_numeric_token(token).ok_or_else(|| {
                    PlatmyError::format(
                        "FORMAT.NUMERIC_TOKEN",
                        format!(
                            "{} line {}: '{}' is not a number",
                            artifact, line_number, token
                        ),
                    )
                })
            })
            .collect::<ParserResult<Vec<_>>>()?;

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(PlatmyError::format(
                    "FORMAT.RAGGED_ROW",
                    format!(
                        "{} line {}: expected {} columns, found {}",
                        artifact,
                        line_number,
                        expected,
                        row.len()
                    ),
                ));
            }
            Some(_) => {}
        }
        rows.push(row);
    }

    Ok(NumericMatrix {
        rows,
        width: width.unwrap_or(0),
    })
}

pub fn parse_numeric_source(source: &str, artifact: &str) -> ParserResult<NumericMatrix> {
    parse_numeric_matrix(
        source.lines().enumerate().map(|(index, line)| (index + 1, line)),
        artifact,
    )
}

pub fn read_text_source(path: &Path) -> ParserResult<String> {
    fs::read_to_string(path).map_err(|source| {
        PlatmyError::io(
            "IO.READ",
            format!("failed to read '{}': {}", path.display(), source),
        )
    })
}

pub fn parse_numeric_token(token: &str) -> Option<f64> {
    let normalized = token.replace(['D', 'd'], "E");
    normalized.parse::<f64>().ok()
}
