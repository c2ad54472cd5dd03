//! CSV export.
//!
//! Renders row records as RFC 4180 style CSV text and hands the result to a
//! save target. Rendering is pure: the same rows and columns always produce
//! byte-identical output.

use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::error::{LeadbookError, Result};

/// A row to export: an ordered mapping of column name to value.
///
/// `serde_json` is built with `preserve_order`, so deriving columns from the
/// first row keeps that row's insertion order.
pub type CsvRow = Map<String, Value>;

/// Export configuration: output file name and optional explicit column list.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Suggested file name handed to the save target.
    pub filename: String,

    /// Columns to emit, in order. When `None`, columns are derived from the
    /// keys of the first row.
    pub columns: Option<Vec<String>>,
}

impl ExportOptions {
    /// Creates options with the given file name and derived columns.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            columns: None,
        }
    }

    /// Sets an explicit column list.
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }
}

/// Where rendered CSV text is delivered.
///
/// The exporter itself never touches the filesystem; delivery is the sink's
/// concern.
pub trait CsvSink {
    /// Saves the rendered text under the suggested file name.
    fn save(&self, filename: &str, contents: &str) -> Result<()>;
}

/// Sink that writes exports into a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    /// Creates a sink writing into the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl CsvSink for DirSink {
    fn save(&self, filename: &str, contents: &str) -> Result<()> {
        let path = self.dir.join(filename);
        std::fs::write(&path, contents).map_err(|e| {
            LeadbookError::internal(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

/// Renders rows and hands the text to the sink.
pub fn export_csv(rows: &[CsvRow], options: &ExportOptions, sink: &dyn CsvSink) -> Result<()> {
    let text = render_csv(rows, options.columns.as_deref());
    sink.save(&options.filename, &text)
}

/// Renders rows as CSV text.
///
/// The header line is emitted first whenever the column list is non-empty; an
/// empty column list produces empty output with no header and no data lines.
/// Every line, header included, is terminated with CRLF.
pub fn render_csv(rows: &[CsvRow], columns: Option<&[String]>) -> String {
    let derived;
    let columns: &[String] = match columns {
        Some(columns) => columns,
        None => {
            derived = rows
                .first()
                .map(|row| row.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            &derived
        }
    };

    if columns.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    push_line(&mut out, columns.iter().map(String::as_str));
    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| stringify(row.get(column)))
            .collect();
        push_line(&mut out, cells.iter().map(String::as_str));
    }
    out
}

/// Appends one CRLF-terminated line of escaped cells.
fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_cell(cell));
    }
    out.push_str("\r\n");
}

/// Stringifies a cell value; null or absent becomes the empty string and
/// strings pass through unchanged. Anything else degrades to its JSON text.
fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Quotes a cell iff it contains a double quote, comma, or line break;
/// embedded double quotes are doubled.
fn escape_cell(value: &str) -> String {
    let needs_quotes = value.contains(['"', ',', '\n', '\r']);
    if needs_quotes {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
