//! Output formatters for run summaries and scan results.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::Result;

/// Output format enum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Markdown,
    Text,
}

impl Format {
    /// Render any serializable value.
    pub fn format<T: Serialize, W: Write>(&self, data: &T, writer: &mut W) -> Result<()> {
        let value = serde_json::to_value(data)?;
        match self {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, &value)?;
                writeln!(writer)?;
            }
            Format::Markdown => write_markdown(&value, writer, 1)?,
            Format::Text => write_text(&value, writer, 0)?,
        }
        Ok(())
    }
}

fn write_markdown<W: Write>(value: &Value, writer: &mut W, depth: usize) -> Result<()> {
    match value {
        Value::Object(map) => {
            let (scalars, nested): (Vec<_>, Vec<_>) = map.iter().partition(|(_, v)| is_scalar(v));
            if !scalars.is_empty() {
                writeln!(writer, "| Field | Value |")?;
                writeln!(writer, "| --- | --- |")?;
                for (key, val) in scalars {
                    writeln!(writer, "| {} | {} |", format_key(key), cell(val))?;
                }
                writeln!(writer)?;
            }
            for (key, val) in nested {
                writeln!(writer, "{} {}\n", "#".repeat(depth.min(6)), format_key(key))?;
                write_markdown(val, writer, depth + 1)?;
            }
        }
        Value::Array(items) if items.is_empty() => writeln!(writer, "_No items_\n")?,
        Value::Array(items) if items.iter().all(is_flat_object) => write_table(items, writer)?,
        Value::Array(items) => {
            for item in items {
                writeln!(writer, "- {}", cell(item))?;
            }
            writeln!(writer)?;
        }
        _ => writeln!(writer, "{}\n", format_scalar(value))?,
    }
    Ok(())
}

/// Markdown table; columns are the union of keys in first-seen order.
fn write_table<W: Write>(items: &[Value], writer: &mut W) -> Result<()> {
    let mut headers: Vec<&str> = Vec::new();
    for item in items {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !headers.contains(&key.as_str()) {
                    headers.push(key);
                }
            }
        }
    }

    let header_row: Vec<String> = headers.iter().map(|h| format_key(h)).collect();
    writeln!(writer, "| {} |", header_row.join(" | "))?;
    writeln!(writer, "|{}", " --- |".repeat(headers.len()))?;

    let empty = Map::new();
    for item in items {
        let map = item.as_object().unwrap_or(&empty);
        let cells: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(cell).unwrap_or_else(|| "-".to_string()))
            .collect();
        writeln!(writer, "| {} |", cells.join(" | "))?;
    }
    writeln!(writer)?;
    Ok(())
}

fn write_text<W: Write>(value: &Value, writer: &mut W, indent: usize) -> Result<()> {
    let prefix = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                if is_scalar(val) {
                    writeln!(writer, "{prefix}{}: {}", format_key(key), format_scalar(val))?;
                } else {
                    writeln!(writer, "{prefix}{}:", format_key(key))?;
                    write_text(val, writer, indent + 1)?;
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                writeln!(writer, "{prefix}[{i}]")?;
                write_text(item, writer, indent + 1)?;
            }
        }
        _ => writeln!(writer, "{prefix}{}", format_scalar(value))?,
    }
    Ok(())
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn is_flat_object(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.values().all(is_scalar))
}

/// `total_addition_lines` → `Total Addition Lines`.
fn format_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Table-safe rendering: nested values as compact JSON, pipes escaped.
fn cell(value: &Value) -> String {
    let text = if is_scalar(value) {
        format_scalar(value)
    } else {
        value.to_string()
    };
    text.replace('|', "\\|").replace('\n', " ")
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
            (Some(u), _, _) => u.to_string(),
            (_, Some(i), _) => i.to_string(),
            (_, _, Some(f)) => format!("{f:.2}"),
            _ => n.to_string(),
        },
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        Value::Null => "-".to_string(),
        _ => value.to_string(),
    }
}
