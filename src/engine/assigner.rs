//! Capacity-constrained random group assignment
//!
//! Pure decision logic: reads a roster snapshot and returns an [`Outcome`].
//! Nothing here touches storage; the caller appends `Assigned` records.

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::clock::Clock;
use crate::config::RosterConfig;
use crate::error::{RosterError, Result};
use crate::roster::{identity_for, AssignmentRecord};

/// Raw registration input as typed into the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Full name, untrimmed
    pub full_name: String,
    /// Optional student id, untrimmed
    pub student_id: Option<String>,
}

impl RegistrationRequest {
    /// Create a request from raw input
    pub fn new(full_name: impl Into<String>, student_id: Option<&str>) -> Self {
        Self {
            full_name: full_name.into(),
            student_id: student_id.map(str::to_string),
        }
    }

    /// Trimmed name
    pub fn name(&self) -> &str {
        self.full_name.trim()
    }

    /// Trimmed id, `None` when absent or blank
    pub fn id(&self) -> Option<&str> {
        self.student_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Result of a registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new record was created and should be appended
    Assigned(AssignmentRecord),
    /// The requester is already on the roster
    AlreadyAssigned(AssignmentRecord),
    /// Name was empty after trimming
    EmptyName,
    /// Roster reached its global capacity
    RosterFull { capacity: usize },
    /// No group has room left
    GroupsFull,
}

impl Outcome {
    /// Record the requester ends up with, if any
    pub fn record(&self) -> Option<&AssignmentRecord> {
        match self {
            Outcome::Assigned(record) | Outcome::AlreadyAssigned(record) => Some(record),
            _ => None,
        }
    }

    /// True only for outcomes that add a record to the roster
    pub fn is_assigned(&self) -> bool {
        matches!(self, Outcome::Assigned(_))
    }

    /// Convert rejections into errors so callers can use `?`
    pub fn into_result(self) -> Result<AssignmentRecord> {
        match self {
            Outcome::Assigned(record) | Outcome::AlreadyAssigned(record) => Ok(record),
            Outcome::EmptyName => Err(RosterError::EmptyName),
            Outcome::RosterFull { capacity } => Err(RosterError::RosterFull { capacity }),
            Outcome::GroupsFull => Err(RosterError::GroupsFull),
        }
    }
}

/// First record matching the request by student id, case-insensitive name,
/// or derived identity
///
/// Scan order is insertion order, so the earliest match wins. The identity
/// check catches an id that equals another student's lowercased name, which
/// would otherwise produce two records with the same identity.
pub fn find_existing<'a>(
    roster: &'a [AssignmentRecord],
    request: &RegistrationRequest,
) -> Option<&'a AssignmentRecord> {
    let id = request.id();
    let name = request.name().to_lowercase();
    let identity = identity_for(request.name(), id);

    roster.iter().find(|record| {
        let id_match = match (id, record.student_id.as_deref()) {
            (Some(wanted), Some(existing)) => wanted == existing,
            _ => false,
        };
        id_match || record.full_name.to_lowercase() == name || record.identity == identity
    })
}

/// Configured groups whose member count is below the per-group capacity
///
/// Order follows the configured group list.
pub fn eligible_groups(roster: &[AssignmentRecord], config: &RosterConfig) -> Vec<u32> {
    config
        .eligible_groups
        .iter()
        .copied()
        .filter(|&group| {
            roster.iter().filter(|r| r.group == group).count() < config.group_capacity
        })
        .collect()
}

/// Decide the outcome of a registration against a roster snapshot
///
/// Checks run in order: empty name, global capacity, duplicate, group room.
/// The group is a fresh uniform draw among eligible groups with no memory
/// of earlier draws, so short runs need not be balanced.
pub fn assign<C, R>(
    roster: &[AssignmentRecord],
    config: &RosterConfig,
    request: &RegistrationRequest,
    clock: &C,
    rng: &mut R,
) -> Outcome
where
    C: Clock + ?Sized,
    R: Rng + ?Sized,
{
    if request.name().is_empty() {
        return Outcome::EmptyName;
    }

    if roster.len() >= config.total_capacity {
        return Outcome::RosterFull {
            capacity: config.total_capacity,
        };
    }

    if let Some(existing) = find_existing(roster, request) {
        debug!("{} already assigned to group {}", existing.identity, existing.group);
        return Outcome::AlreadyAssigned(existing.clone());
    }

    let eligible = eligible_groups(roster, config);
    debug!("Eligible groups: {:?}", eligible);

    let Some(&group) = eligible.choose(rng) else {
        return Outcome::GroupsFull;
    };

    Outcome::Assigned(AssignmentRecord::new(
        request.name(),
        request.id(),
        group,
        clock.now_millis(),
    ))
}
