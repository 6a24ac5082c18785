//! CSV export of the roster
//!
//! Rows are ordered by group, then by assignment time. By default fields are
//! joined verbatim with no quoting, so a name containing a comma shifts the
//! columns of its row. [`FieldEscaping::Quoted`] applies RFC 4180 quoting
//! for callers that need well-formed output.

use chrono::{FixedOffset, Local, Offset, TimeZone, Utc};

use crate::error::{RosterError, Result};
use crate::roster::{group_label, AssignmentRecord};

/// Header row of the export
pub const CSV_HEADER: [&str; 4] = ["Name", "Student ID", "Group", "Assigned At"];

/// Placeholder for records without a student id
pub const MISSING_ID: &str = "N/A";

/// MIME type of the exported file
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How fields are written into a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldEscaping {
    /// Join fields as-is
    #[default]
    None,
    /// Quote fields containing delimiters, quotes, or line breaks
    Quoted,
}

/// Zone timestamps are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportZone {
    /// Host local time, offset resolved per timestamp
    #[default]
    Local,
    /// One fixed offset for every timestamp
    Fixed(FixedOffset),
}

/// Export formatting options
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Field escaping mode
    pub escaping: FieldEscaping,
    /// Zone used to render timestamps and the file date
    pub zone: ExportZone,
}

impl ExportOptions {
    /// Options rendering times in UTC
    pub fn utc() -> Self {
        Self::default().with_zone(ExportZone::Fixed(Utc.fix()))
    }

    /// Set the escaping mode
    pub fn with_escaping(mut self, escaping: FieldEscaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Set the rendering zone
    pub fn with_zone(mut self, zone: ExportZone) -> Self {
        self.zone = zone;
        self
    }

    fn format_millis(&self, millis: i64, format: &str) -> String {
        match self.zone {
            ExportZone::Local => render(&Local, millis, format),
            ExportZone::Fixed(offset) => render(&offset, millis, format),
        }
    }
}

fn render<Tz>(zone: &Tz, millis: i64, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    zone.timestamp_millis_opt(millis)
        .single()
        .map(|ts| ts.format(format).to_string())
        .unwrap_or_default()
}

/// One exported line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    /// Full name as registered
    pub name: String,
    /// Student id, or [`MISSING_ID`]
    pub student_id: String,
    /// Group label, e.g. `Group 3`
    pub group: String,
    /// Assignment time as `YYYY-MM-DD HH:MM:SS`
    pub assigned_at: String,
}

impl ExportRow {
    fn fields(&self) -> [&str; 4] {
        [
            self.name.as_str(),
            self.student_id.as_str(),
            self.group.as_str(),
            self.assigned_at.as_str(),
        ]
    }
}

/// Project the roster into rows sorted by (group, assigned time)
pub fn export_rows(roster: &[AssignmentRecord], options: &ExportOptions) -> Vec<ExportRow> {
    let mut sorted: Vec<&AssignmentRecord> = roster.iter().collect();
    sorted.sort_by_key(|r| (r.group, r.assigned_at_ms));

    sorted
        .into_iter()
        .map(|r| ExportRow {
            name: r.full_name.clone(),
            student_id: r.student_id.clone().unwrap_or_else(|| MISSING_ID.into()),
            group: group_label(r.group),
            assigned_at: options.format_millis(r.assigned_at_ms, TIMESTAMP_FORMAT),
        })
        .collect()
}

/// Render the roster as comma-separated text with a header row
pub fn to_csv(roster: &[AssignmentRecord], options: &ExportOptions) -> String {
    let mut lines = Vec::with_capacity(roster.len() + 1);
    lines.push(join_line(&CSV_HEADER, options.escaping));
    for row in export_rows(roster, options) {
        lines.push(join_line(&row.fields(), options.escaping));
    }
    lines.join("\n")
}

fn join_line(fields: &[&str], escaping: FieldEscaping) -> String {
    match escaping {
        FieldEscaping::None => fields.join(","),
        FieldEscaping::Quoted => fields
            .iter()
            .map(|f| quote_field(f))
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Downloadable export file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name, embedding the export date
    pub filename: String,
    /// MIME type
    pub mime_type: &'static str,
    /// CSV body
    pub body: String,
}

impl ExportArtifact {
    /// Build the export file for `roster` at time `now_ms`
    pub fn build(
        roster: &[AssignmentRecord],
        options: &ExportOptions,
        now_ms: i64,
    ) -> Result<Self> {
        if roster.is_empty() {
            return Err(RosterError::NothingToExport);
        }

        Ok(Self {
            filename: format!(
                "group_registrations_{}.csv",
                options.format_millis(now_ms, "%Y-%m-%d")
            ),
            mime_type: CSV_MIME_TYPE,
            body: to_csv(roster, options),
        })
    }

    /// Number of data rows, excluding the header
    pub fn row_count(&self) -> usize {
        self.body.lines().count().saturating_sub(1)
    }
}
