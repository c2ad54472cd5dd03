//! Command handlers wiring the CLI to the store.
//!
//! Each handler awaits the store call and only reports success after the
//! store confirms; nothing is applied locally ahead of confirmation.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::error::{LeadbookError, Result};
use crate::export::{export_csv, CsvRow, CsvSink, DirSink, ExportOptions};
use crate::lead::{Lead, LeadPatch, LeadStatus, NewLead};
use crate::query::{LeadQueryPipeline, PipelineOutcome, SortMode};
use crate::store::LeadStore;

/// Columns emitted by the lead export, in order.
pub const LEAD_EXPORT_COLUMNS: [&str; 7] = [
    "name",
    "business",
    "instagram_handle",
    "email",
    "status",
    "notes",
    "date_added",
];

/// Fields accepted by the add and edit commands.
#[derive(Debug, Clone, Default)]
pub struct LeadFields {
    pub name: Option<String>,
    pub business: Option<String>,
    pub instagram: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Application command handlers.
pub struct App {
    store: Arc<dyn LeadStore>,
    pipeline: LeadQueryPipeline,
}

impl App {
    /// Creates an app over the given store.
    pub fn new(store: Arc<dyn LeadStore>) -> Self {
        let pipeline = LeadQueryPipeline::new(Arc::clone(&store));
        Self { store, pipeline }
    }

    /// Lists leads for the search term and sort selection.
    pub async fn list(&self, search: &str, sort: SortMode) -> Result<Vec<Lead>> {
        match self.pipeline.run(search, sort).await? {
            PipelineOutcome::Fresh(leads) => Ok(leads),
            PipelineOutcome::Superseded => Ok(Vec::new()),
        }
    }

    /// Creates a lead from the given fields.
    ///
    /// The name is required and must not be blank; validation failures abort
    /// before any store call.
    pub async fn add(&self, fields: LeadFields) -> Result<Lead> {
        let name = fields
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| LeadbookError::validation("Name is required"))?
            .to_string();

        let status = match fields.status.as_deref() {
            Some(s) => parse_status(s)?,
            None => LeadStatus::New,
        };

        let lead = NewLead {
            name: Some(name),
            business: fields.business,
            instagram_handle: fields.instagram,
            email: fields.email,
            status,
            notes: fields.notes,
        };

        let stored = self.store.insert(&lead).await?;
        info!("Created lead {}", stored.id);
        Ok(stored)
    }

    /// Fetches a single lead.
    pub async fn show(&self, id: &str) -> Result<Lead> {
        self.store.get(id).await
    }

    /// Applies the set fields of an edit to a lead.
    pub async fn edit(&self, id: &str, fields: LeadFields) -> Result<Lead> {
        let patch = LeadPatch {
            name: fields.name,
            business: fields.business,
            instagram_handle: fields.instagram,
            email: fields.email,
            status: fields.status.as_deref().map(parse_status).transpose()?,
            notes: fields.notes,
        };
        if patch.is_empty() {
            return Err(LeadbookError::validation("No fields to update"));
        }
        self.store.update(id, &patch).await
    }

    /// Updates just the status of a lead.
    pub async fn set_status(&self, id: &str, status: &str) -> Result<Lead> {
        let patch = LeadPatch {
            status: Some(parse_status(status)?),
            ..Default::default()
        };
        self.store.update(id, &patch).await
    }

    /// Updates just the notes of a lead.
    pub async fn set_notes(&self, id: &str, notes: &str) -> Result<Lead> {
        let patch = LeadPatch {
            notes: Some(notes.to_string()),
            ..Default::default()
        };
        self.store.update(id, &patch).await
    }

    /// Deletes a lead.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        info!("Deleted lead {id}");
        Ok(())
    }

    /// Exports the leads matching the search and sort to a CSV file.
    ///
    /// Returns the number of exported rows.
    pub async fn export(&self, search: &str, sort: SortMode, output: &Path) -> Result<usize> {
        let leads = self.list(search, sort).await?;

        let filename = output
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                LeadbookError::validation(format!("Invalid output path: {}", output.display()))
            })?;
        let dir = output.parent().filter(|p| !p.as_os_str().is_empty());
        let sink = DirSink::new(dir.unwrap_or_else(|| Path::new(".")));

        self.export_to_sink(&leads, filename, &sink)?;
        Ok(leads.len())
    }

    /// Renders the leads and hands the CSV text to the sink.
    pub fn export_to_sink(&self, leads: &[Lead], filename: &str, sink: &dyn CsvSink) -> Result<()> {
        let rows = lead_export_rows(leads);
        let columns = LEAD_EXPORT_COLUMNS.iter().map(|c| c.to_string()).collect();
        let options = ExportOptions::new(filename).with_columns(columns);
        export_csv(&rows, &options, sink)
    }
}

/// Parses a status argument, mapping bad values to validation errors.
pub fn parse_status(s: &str) -> Result<LeadStatus> {
    s.parse().map_err(LeadbookError::validation)
}

/// Parses a sort argument, mapping bad values to validation errors.
pub fn parse_sort(s: &str) -> Result<SortMode> {
    s.parse().map_err(LeadbookError::validation)
}

/// Builds the export rows for a set of leads; absent fields become empty
/// strings and the status label falls back to `new`.
pub fn lead_export_rows(leads: &[Lead]) -> Vec<CsvRow> {
    leads
        .iter()
        .map(|lead| {
            let mut row = CsvRow::new();
            let text = |value: &Option<String>| {
                Value::String(value.clone().unwrap_or_default())
            };
            row.insert("name".to_string(), text(&lead.name));
            row.insert("business".to_string(), text(&lead.business));
            row.insert(
                "instagram_handle".to_string(),
                text(&lead.instagram_handle),
            );
            row.insert("email".to_string(), text(&lead.email));
            row.insert(
                "status".to_string(),
                Value::String(lead.status_label().to_string()),
            );
            row.insert("notes".to_string(), text(&lead.notes));
            row.insert(
                "date_added".to_string(),
                Value::String(
                    lead.date_added
                        .map(|d| d.to_rfc3339())
                        .unwrap_or_default(),
                ),
            );
            row
        })
        .collect()
}

/// Renders leads as a plain-text table.
pub fn render_table(leads: &[Lead]) -> String {
    const HEADERS: [&str; 7] = [
        "ID", "NAME", "BUSINESS", "EMAIL", "INSTAGRAM", "STATUS", "DATE",
    ];

    let rows: Vec<[String; 7]> = leads
        .iter()
        .map(|lead| {
            [
                lead.id.clone(),
                cell(&lead.name),
                cell(&lead.business),
                cell(&lead.email),
                cell(&lead.instagram_handle),
                lead.status_label().to_string(),
                lead.date_added
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths: [usize; 7] = HEADERS.map(str::len);
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    push_table_row(&mut out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_table_row(&mut out, row, &widths);
    }
    out
}

fn cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn push_table_row(out: &mut String, row: &[String; 7], widths: &[usize; 7]) {
    let line = row
        .iter()
        .zip(widths.iter())
        .map(|(value, &width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}
