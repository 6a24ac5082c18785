//! Registration desk
//!
//! The application service the presentation layer drives. It owns the roster
//! store, the admin gate, and the submission state machine; the engine and
//! export functions only ever see borrowed snapshots.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::admin::{AdminGate, Confirm};
use crate::config::RosterConfig;
use crate::engine::{assign, Clock, Outcome, RegistrationRequest, SystemClock};
use crate::error::{RosterError, Result};
use crate::export::{ExportArtifact, ExportOptions};
use crate::metrics::standard;
use crate::roster::{AssignmentRecord, RosterStore};
use crate::storage::KeyValueStore;

/// Submission state machine: `Idle -> Submitting -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Ready for a new submission
    Idle,
    /// A submission is waiting out the delay or being decided
    Submitting,
}

/// Holds the desk in `Submitting`; dropping it returns to `Idle`
struct SubmissionGuard<'a> {
    state: &'a Mutex<SubmissionState>,
}

impl<'a> SubmissionGuard<'a> {
    fn begin(state: &'a Mutex<SubmissionState>) -> Result<Self> {
        let mut current = state.lock();
        if *current != SubmissionState::Idle {
            return Err(RosterError::SubmissionInProgress);
        }
        *current = SubmissionState::Submitting;
        Ok(Self { state })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = SubmissionState::Idle;
    }
}

/// One group's current membership
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// Group number
    pub group: u32,
    /// Members, earliest assignment first
    pub members: Vec<AssignmentRecord>,
    /// Per-group capacity
    pub capacity: usize,
    /// External chat link
    pub link: Option<String>,
}

impl GroupSummary {
    /// True when no more members fit
    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }
}

/// Self-service registration front desk
pub struct RegistrationDesk<S: KeyValueStore, C: Clock = SystemClock> {
    config: RosterConfig,
    roster: RwLock<RosterStore<S>>,
    admin: RwLock<AdminGate>,
    state: Mutex<SubmissionState>,
    clock: C,
    rng: Mutex<StdRng>,
    export_options: ExportOptions,
}

impl<S: KeyValueStore> RegistrationDesk<S, SystemClock> {
    /// Open a desk over `backend` using the wall clock and OS randomness
    pub fn open(backend: S, config: RosterConfig) -> Result<Self> {
        Self::with_parts(backend, config, SystemClock, StdRng::from_os_rng())
    }
}

impl<S: KeyValueStore, C: Clock> RegistrationDesk<S, C> {
    /// Open a desk with an explicit clock and random source
    pub fn with_parts(backend: S, config: RosterConfig, clock: C, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let roster = RosterStore::load(backend, config.storage_key.clone());
        standard::ROSTER_SIZE.set(roster.len() as i64);

        info!(
            "Registration desk open: groups {:?}, {} per group, {} total",
            config.eligible_groups, config.group_capacity, config.total_capacity
        );

        Ok(Self {
            admin: RwLock::new(AdminGate::new(config.admin_passcode.clone())),
            roster: RwLock::new(roster),
            state: Mutex::new(SubmissionState::Idle),
            clock,
            rng: Mutex::new(rng),
            export_options: ExportOptions::default(),
            config,
        })
    }

    /// Override export formatting
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.export_options = options;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Current submission state
    pub fn submission_state(&self) -> SubmissionState {
        *self.state.lock()
    }

    /// Submit a registration
    ///
    /// Fails with `SubmissionInProgress` if another submission has not
    /// finished. Only `Assigned` outcomes touch the roster.
    pub async fn submit(&self, full_name: &str, student_id: Option<&str>) -> Result<Outcome> {
        let _guard = SubmissionGuard::begin(&self.state)?;
        let request = RegistrationRequest::new(full_name, student_id);

        if request.name().is_empty() {
            standard::REJECTIONS.inc();
            return Ok(Outcome::EmptyName);
        }

        tokio::time::sleep(self.config.submit_delay).await;

        let mut roster = self.roster.write().await;
        let outcome = {
            let mut rng = self.rng.lock();
            assign(roster.records(), &self.config, &request, &self.clock, &mut *rng)
        };

        match &outcome {
            Outcome::Assigned(record) => {
                roster.append(record.clone())?;
                standard::REGISTRATIONS.inc();
                standard::ROSTER_SIZE.set(roster.len() as i64);
                info!("Assigned {} to group {}", record.identity, record.group);
            }
            Outcome::AlreadyAssigned(record) => {
                standard::DUPLICATE_LOOKUPS.inc();
                debug!("{} already in group {}", record.identity, record.group);
            }
            rejected => {
                standard::REJECTIONS.inc();
                debug!("Registration rejected: {:?}", rejected);
            }
        }

        Ok(outcome)
    }

    /// Copy of the roster in insertion order
    pub async fn snapshot(&self) -> Vec<AssignmentRecord> {
        self.roster.read().await.records().to_vec()
    }

    /// Number of records on the roster
    pub async fn signed_up(&self) -> usize {
        self.roster.read().await.len()
    }

    /// Remaining global capacity
    pub async fn spots_left(&self) -> usize {
        self.config
            .total_capacity
            .saturating_sub(self.roster.read().await.len())
    }

    /// Membership of every configured group, in configured order
    pub async fn groups(&self) -> Vec<GroupSummary> {
        let roster = self.roster.read().await;
        self.config
            .eligible_groups
            .iter()
            .map(|&group| GroupSummary {
                group,
                members: roster.members_of(group).into_iter().cloned().collect(),
                capacity: self.config.group_capacity,
                link: self.config.link_for(group).map(str::to_string),
            })
            .collect()
    }

    /// Pick up writes made by other instances sharing the backend
    pub async fn reload(&self) {
        let mut roster = self.roster.write().await;
        roster.reload();
        standard::ROSTER_SIZE.set(roster.len() as i64);
    }

    // ========== Admin ==========

    /// Enter admin mode
    pub async fn login(&self, passcode: &str) -> Result<()> {
        self.admin.write().await.login(passcode)
    }

    /// Leave admin mode
    pub async fn logout(&self) {
        self.admin.write().await.logout();
    }

    /// Whether admin mode is on
    pub async fn is_admin(&self) -> bool {
        self.admin.read().await.is_active()
    }

    /// Remove one record (admin only)
    pub async fn remove(&self, identity: &str) -> Result<AssignmentRecord> {
        let gate = self.admin.read().await;
        let admin = gate.require()?;

        let mut roster = self.roster.write().await;
        let removed = roster.remove(&admin, identity)?;
        standard::ROSTER_SIZE.set(roster.len() as i64);
        Ok(removed)
    }

    /// Clear the roster after operator confirmation (admin only)
    ///
    /// Returns `false` when the operator declines.
    pub async fn reset<F: Confirm + ?Sized>(&self, confirm: &F) -> Result<bool> {
        let gate = self.admin.read().await;
        let admin = gate.require()?;

        let prompt = format!(
            "Reset ALL data? This will clear all {} spots.",
            self.config.total_capacity
        );
        if !confirm.confirm(&prompt) {
            info!("Reset declined by operator");
            return Ok(false);
        }

        let mut roster = self.roster.write().await;
        roster.clear(&admin)?;
        standard::ROSTER_SIZE.set(0);
        Ok(true)
    }

    /// Build the CSV export (admin only)
    pub async fn export(&self) -> Result<ExportArtifact> {
        let gate = self.admin.read().await;
        gate.require()?;

        let roster = self.roster.read().await;
        ExportArtifact::build(
            roster.records(),
            &self.export_options,
            self.clock.now_millis(),
        )
    }
}
