//! Assignment records
//!
//! A record is created once by a successful registration and never mutated.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One student's group assignment
///
/// Serialized field names follow the stored roster format
/// (`id`, `name`, `studentId`, `groupId`, `assignedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Deduplication key: student id if given, else lowercased name
    #[serde(rename = "id")]
    pub identity: String,
    /// Trimmed full name
    #[serde(rename = "name")]
    pub full_name: String,
    /// Trimmed student identifier, if one was provided
    #[serde(
        rename = "studentId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub student_id: Option<String>,
    /// Assigned group number
    #[serde(rename = "groupId")]
    pub group: u32,
    /// Creation time in milliseconds since the Unix epoch
    #[serde(rename = "assignedAt")]
    pub assigned_at_ms: i64,
}

impl AssignmentRecord {
    /// Build a record from raw form input
    ///
    /// Inputs are trimmed here; the caller has already checked that the
    /// trimmed name is non-empty.
    pub fn new(full_name: &str, student_id: Option<&str>, group: u32, assigned_at_ms: i64) -> Self {
        let full_name = full_name.trim().to_string();
        let student_id = normalize_student_id(student_id);
        let identity = identity_for(&full_name, student_id.as_deref());

        Self {
            identity,
            full_name,
            student_id,
            group,
            assigned_at_ms,
        }
    }

    /// Creation time as a UTC timestamp
    pub fn assigned_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.assigned_at_ms)
            .single()
            .unwrap_or_default()
    }

    /// Label shown for the group, e.g. `Group 3`
    pub fn group_label(&self) -> String {
        group_label(self.group)
    }
}

/// Trim an optional id, mapping blank input to `None`
pub fn normalize_student_id(student_id: Option<&str>) -> Option<String> {
    student_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

/// Deduplication key for a name/id pair
pub fn identity_for(full_name: &str, student_id: Option<&str>) -> String {
    match student_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => full_name.trim().to_lowercase(),
    }
}

/// Display label for a group number
pub fn group_label(group: u32) -> String {
    format!("Group {}", group)
}
