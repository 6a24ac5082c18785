//! StudySync Core - self-service random group assignment
//!
//! This crate provides the logic behind a registration form that:
//! - Places each student in a random group with room left
//! - Answers repeat registrations with the existing assignment
//! - Persists the roster as one JSON blob in key-value storage
//! - Exports the roster as CSV for administrators

pub mod admin;
pub mod config;
pub mod desk;
pub mod engine;
pub mod error;
pub mod export;
pub mod metrics;
pub mod notice;
pub mod roster;
pub mod storage;

pub use config::RosterConfig;
pub use desk::{GroupSummary, RegistrationDesk, SubmissionState};
pub use engine::{assign, Outcome, RegistrationRequest};
pub use error::RosterError;
pub use roster::{AssignmentRecord, RosterStore};

/// Group numbers open for registration
pub const TARGET_GROUPS: [u32; 4] = [2, 3, 4, 5];

/// Default members per group (4 x 13 covers the 50 total)
pub const DEFAULT_GROUP_CAPACITY: usize = 13;

/// Default roster-wide capacity
pub const DEFAULT_TOTAL_CAPACITY: usize = 50;

/// Default admin passcode
pub const DEFAULT_ADMIN_PASSCODE: &str = "1234";

/// Storage key of the serialized roster
pub const DEFAULT_STORAGE_KEY: &str = "group_generator_students";

/// Default pause before a submission is decided, in milliseconds
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 800;
