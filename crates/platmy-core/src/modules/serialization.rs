use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Scientific notation with a signed, at least two-digit exponent
/// (`1.500000e+02`), the layout legacy Fortran readers expect.
pub fn format_scientific(value: f64, precision: usize) -> String {
    let rendered = format!("{value:.precision$e}");
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return rendered;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return rendered;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.abs())
}

/// One line per row, columns separated by a single space.
///
/// Rows beyond the shortest column are dropped; callers check lengths first.
pub fn render_numeric_columns(columns: &[&[f64]], precision: usize) -> String {
    let row_count = columns.iter().map(|column| column.len()).min().unwrap_or(0);
    let mut rendered = String::new();
    for row in 0..row_count {
        let line = columns
            .iter()
            .map(|column| format_scientific(column[row], precision))
            .collect::<Vec<_>>()
            .join(" ");
        rendered.push_str(&line);
        rendered.push('\n');
    }
    rendered
}

pub fn normalize_text_artifact(content: &str) -> String {
    let mut normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    if !normalized.is_empty() && !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    normalized
}

pub fn write_text_artifact(path: &Path, content: &str) -> std::io::Result<()> {
    fs::write(path, normalize_text_artifact(content))
}

/// Writes through a temporary sibling file and renames it into place, so a
/// reader never sees a half-written artifact.
pub fn write_text_artifact_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(normalize_text_artifact(content).as_bytes())?;
    staged.flush()?;
    staged.persist(path).map_err(|error| error.error)?;
    Ok(())
}
