//! Assignment engine
//!
//! Duplicate detection and random group selection over a roster snapshot.

pub mod assigner;
pub mod clock;

pub use assigner::{assign, eligible_groups, find_existing, Outcome, RegistrationRequest};
pub use clock::{Clock, ManualClock, SystemClock};
