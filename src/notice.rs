//! Transient user notifications
//!
//! Every outcome and error is surfaced to the person at the form as a short
//! message; nothing is fatal.

use crate::engine::Outcome;
use crate::error::RosterError;

/// Shown in place of raw storage errors
const STORAGE_FAILURE_MESSAGE: &str = "Could not save registrations. Please try again.";

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Action completed
    Success,
    /// Action rejected or failed
    Error,
    /// Neutral status change
    Info,
}

/// Message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the user
    pub message: String,
}

impl Notice {
    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Admin mode was unlocked
    pub fn admin_granted() -> Self {
        Self::success("Admin access granted")
    }

    /// Roster was cleared after confirmation
    pub fn reset_done() -> Self {
        Self::success("System Reset Successful")
    }

    /// One record was removed by an admin
    pub fn student_removed() -> Self {
        Self::info("Student removed")
    }

    /// Notice for a registration outcome
    ///
    /// Both assignment variants report the group the requester belongs to.
    pub fn for_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Assigned(record) | Outcome::AlreadyAssigned(record) => Self::success(format!(
                "Hi {}, you have been assigned to {}.",
                record.full_name,
                record.group_label()
            )),
            Outcome::EmptyName => Self::from(&RosterError::EmptyName),
            Outcome::RosterFull { capacity } => Self::from(&RosterError::RosterFull {
                capacity: *capacity,
            }),
            Outcome::GroupsFull => Self::from(&RosterError::GroupsFull),
        }
    }
}

impl From<&RosterError> for Notice {
    fn from(err: &RosterError) -> Self {
        if err.is_storage() {
            Self::error(STORAGE_FAILURE_MESSAGE)
        } else {
            Self::error(err.to_string())
        }
    }
}
