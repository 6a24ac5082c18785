//! Error types for StudySync
//!
//! Covers registration rejections, storage failures, and administrative
//! gating. Every variant is recoverable; none should take the instance down.

use thiserror::Error;

/// Primary error type for all roster operations
#[derive(Debug, Error)]
pub enum RosterError {
    // ========== Registration Errors ==========

    /// Submitted name was empty after trimming
    #[error("Full name is required")]
    EmptyName,

    /// Global roster capacity reached
    #[error("Registration is closed. All {capacity} spots are taken.")]
    RosterFull { capacity: usize },

    /// Every eligible group is at capacity
    #[error("All groups are currently full.")]
    GroupsFull,

    /// A submission is already being processed
    #[error("A registration is already being processed")]
    SubmissionInProgress,

    // ========== Storage Errors ==========

    /// Stored roster could not be parsed
    #[error("Failed to parse stored roster under {key}: {reason}")]
    StorageParse { key: String, reason: String },

    /// Backend read/write failed
    #[error("Storage operation failed: {message}")]
    Storage { message: String },

    /// Roster could not be serialized
    #[error("Serialization failed: {reason}")]
    Serialization { reason: String },

    // ========== Administrative Errors ==========

    /// Operation needs an active admin session
    #[error("Admin access required")]
    AdminRequired,

    /// Passcode did not match
    #[error("Invalid passcode")]
    InvalidPasscode,

    /// Export requested on an empty roster
    #[error("No data to export")]
    NothingToExport,

    /// No record carries this identity
    #[error("No record with identity {identity}")]
    UnknownRecord { identity: String },

    // ========== Configuration Errors ==========

    /// Configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl RosterError {
    /// Returns true if this error originated in the storage layer
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            RosterError::StorageParse { .. }
                | RosterError::Storage { .. }
                | RosterError::Serialization { .. }
        )
    }
}

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_notifications() {
        assert_eq!(RosterError::EmptyName.to_string(), "Full name is required");
        assert_eq!(
            RosterError::RosterFull { capacity: 50 }.to_string(),
            "Registration is closed. All 50 spots are taken."
        );
        assert_eq!(RosterError::GroupsFull.to_string(), "All groups are currently full.");
    }

    #[test]
    fn test_classification() {
        assert!(!RosterError::GroupsFull.is_storage());
        let parse = RosterError::StorageParse {
            key: "k".into(),
            reason: "eof".into(),
        };
        assert!(parse.is_storage());
    }
}
