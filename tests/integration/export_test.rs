//! CSV export behavior through the public API.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use leadbook::export::{export_csv, render_csv, CsvRow, CsvSink, ExportOptions};

fn row(pairs: &[(&str, Value)]) -> CsvRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Sink capturing what the exporter hands over.
#[derive(Default)]
struct CaptureSink {
    saved: std::sync::Mutex<Vec<(String, String)>>,
}

impl CsvSink for CaptureSink {
    fn save(&self, filename: &str, contents: &str) -> leadbook::error::Result<()> {
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), contents.to_string()));
        Ok(())
    }
}

#[test]
fn quoted_cells_match_reference_output() {
    let rows = vec![row(&[("name", json!("Jo\"e")), ("business", json!("A,B"))])];
    let columns = vec!["name".to_string(), "business".to_string()];
    let csv = render_csv(&rows, Some(&columns));
    assert_eq!(csv, "name,business\r\n\"Jo\"\"e\",\"A,B\"\r\n");
}

#[test]
fn line_count_is_one_plus_rows_for_nonempty_columns() {
    for row_count in [0usize, 1, 3, 10] {
        let rows: Vec<CsvRow> = (0..row_count)
            .map(|i| row(&[("id", json!(i.to_string())), ("v", json!("x"))]))
            .collect();
        let columns = vec!["id".to_string(), "v".to_string()];
        let csv = render_csv(&rows, Some(&columns));
        assert_eq!(csv.lines().count(), 1 + row_count, "rows={row_count}");
    }
}

#[test]
fn empty_column_list_produces_empty_output() {
    let rows = vec![row(&[("a", json!("1"))])];
    assert_eq!(render_csv(&rows, Some(&[])), "");
}

#[test]
fn derived_columns_follow_first_row_order() {
    let rows = vec![
        row(&[
            ("name", json!("Jo")),
            ("email", json!("jo@acme.test")),
            ("status", json!("new")),
        ]),
        row(&[("status", json!("closed")), ("name", json!("Sam"))]),
    ];
    let csv = render_csv(&rows, None);
    assert_eq!(
        csv,
        "name,email,status\r\nJo,jo@acme.test,new\r\nSam,,closed\r\n"
    );
}

#[test]
fn repeated_export_is_byte_identical() {
    let rows = vec![
        row(&[("a", json!("x\r\ny")), ("b", json!(null))]),
        row(&[("a", json!(7)), ("b", json!("plain"))]),
    ];
    let columns = vec!["a".to_string(), "b".to_string()];
    let first = render_csv(&rows, Some(&columns));
    let second = render_csv(&rows, Some(&columns));
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn export_hands_filename_and_text_to_sink() {
    let rows = vec![row(&[("a", json!("1"))])];
    let options = ExportOptions::new("leads.csv").with_columns(vec!["a".to_string()]);
    let sink = CaptureSink::default();

    export_csv(&rows, &options, &sink).unwrap();

    let saved = sink.saved.lock().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, "leads.csv");
    assert_eq!(saved[0].1, "a\r\n1\r\n");
}
