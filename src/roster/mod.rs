//! Roster of group assignments
//!
//! Records plus the store that owns and persists them.

pub mod record;
pub mod store;

pub use record::{group_label, identity_for, AssignmentRecord};
pub use store::{decode_roster, encode_roster, RosterStore};
