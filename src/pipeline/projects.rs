//! Input project list.

use std::path::Path;

use crate::core::{Error, Result};

/// Header value of the identifier column; rows carrying it are skipped.
pub const HEADER_CELL: &str = "Project Name";

/// Read `<owner>/<name>` identifiers from the first column of a comma-separated file.
pub fn read_project_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Input {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(parse_project_list(&content))
}

/// Extract identifiers from project list text.
pub fn parse_project_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(first_cell)
        .filter(|cell| !cell.trim().is_empty() && cell != HEADER_CELL)
        .collect()
}

/// First field of a CSV line, unquoting `"..."` with doubled inner quotes.
fn first_cell(line: &str) -> String {
    let line = line.trim_start_matches('\u{feff}');
    let Some(rest) = line.strip_prefix('"') else {
        return line.split(',').next().unwrap_or_default().to_string();
    };

    let mut cell = String::new();
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                cell.push('"');
            } else {
                break;
            }
        } else {
            cell.push(c);
        }
    }
    cell
}
