use std::fs;
use std::path::Path;
use thiserror::Error;

use super::ScalarField;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot open file: {0}")]
    FileNotFound(String),
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },
    #[error("Row {row} has {actual} values, expected {expected}")]
    InconsistentRow {
        row: usize,
        actual: usize,
        expected: usize,
    },
    #[error("File is empty")]
    EmptyFile,
}

fn parse_value(s: &str, line: usize) -> Result<f32, LoadError> {
    s.parse().map_err(|_| LoadError::ParseError {
        line,
        message: format!("expected number, got '{}'", s),
    })
}

/// Load a scalar grid from a text file
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<ScalarField, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|_| LoadError::FileNotFound(path.display().to_string()))?;

    let field = parse_grid(&content)?;
    log::debug!(
        "loaded {}x{} grid from {}",
        field.width(),
        field.height(),
        path.display()
    );
    Ok(field)
}

/// Parse grid content: one row per line, whitespace-separated values.
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_grid(content: &str) -> Result<ScalarField, LoadError> {
    let mut data: Vec<f32> = Vec::new();
    let mut height = 0;
    let mut expected_width: Option<usize> = None;

    for (line_idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(|value| parse_value(value, line_idx + 1))
            .collect::<Result<Vec<f32>, _>>()?;

        if let Some(expected) = expected_width {
            if row.len() != expected {
                return Err(LoadError::InconsistentRow {
                    row: line_idx + 1,
                    actual: row.len(),
                    expected,
                });
            }
        } else {
            expected_width = Some(row.len());
        }

        data.extend(row);
        height += 1;
    }

    let Some(width) = expected_width else {
        return Err(LoadError::EmptyFile);
    };

    // Row widths were checked above, so the length always matches
    ScalarField::new(width, height, data).map_err(|e| LoadError::ParseError {
        line: 0,
        message: e.to_string(),
    })
}
