//! Roster configuration
//!
//! All limits are compiled in; [`RosterConfig::default`] reproduces the
//! production values and tests build their own.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use crate::error::{RosterError, Result};
use crate::{
    DEFAULT_ADMIN_PASSCODE, DEFAULT_GROUP_CAPACITY, DEFAULT_STORAGE_KEY, DEFAULT_SUBMIT_DELAY_MS,
    DEFAULT_TOTAL_CAPACITY, TARGET_GROUPS,
};

/// Configuration for a registration roster
#[derive(Debug, Clone)]
pub struct RosterConfig {
    /// Group numbers that can receive new members
    pub eligible_groups: Vec<u32>,
    /// Maximum members per group
    pub group_capacity: usize,
    /// Maximum members across all groups
    pub total_capacity: usize,
    /// Shared secret that unlocks admin mode
    pub admin_passcode: String,
    /// Storage key holding the serialized roster
    pub storage_key: String,
    /// Pause between submission and decision
    pub submit_delay: Duration,
    /// External chat link per group
    pub group_links: BTreeMap<u32, String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        let group_links = [
            (2, "https://chat.whatsapp.com/GSp27Rpgqp0EeTZjADbffY"),
            (3, "https://chat.whatsapp.com/FeqbbuRkHnE0WUZP7rJwtP"),
            (4, "https://chat.whatsapp.com/IvsghT87HQh9J7yiy10NLF"),
            (5, "https://chat.whatsapp.com/GIB1b754vsKKCrWdUfsbbb"),
        ]
        .into_iter()
        .map(|(group, link)| (group, link.to_string()))
        .collect();

        Self {
            eligible_groups: TARGET_GROUPS.to_vec(),
            group_capacity: DEFAULT_GROUP_CAPACITY,
            total_capacity: DEFAULT_TOTAL_CAPACITY,
            admin_passcode: DEFAULT_ADMIN_PASSCODE.into(),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            submit_delay: Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
            group_links,
        }
    }
}

impl RosterConfig {
    /// Config with the given groups and limits, everything else default
    pub fn with_limits(groups: &[u32], group_capacity: usize, total_capacity: usize) -> Self {
        Self {
            eligible_groups: groups.to_vec(),
            group_capacity,
            total_capacity,
            ..Default::default()
        }
    }

    /// Override the submission delay
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Override the admin passcode
    pub fn with_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.admin_passcode = passcode.into();
        self
    }

    /// Link for a group, if one is configured
    pub fn link_for(&self, group: u32) -> Option<&str> {
        self.group_links.get(&group).map(String::as_str)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.eligible_groups.is_empty() {
            return Err(RosterError::InvalidConfig {
                reason: "no eligible groups configured".into(),
            });
        }

        let mut seen = HashSet::new();
        for group in &self.eligible_groups {
            if !seen.insert(*group) {
                return Err(RosterError::InvalidConfig {
                    reason: format!("group {} listed twice", group),
                });
            }
        }

        if self.group_capacity == 0 || self.total_capacity == 0 {
            return Err(RosterError::InvalidConfig {
                reason: "capacities must be non-zero".into(),
            });
        }

        if self.storage_key.is_empty() {
            return Err(RosterError::InvalidConfig {
                reason: "storage key is empty".into(),
            });
        }

        Ok(())
    }
}
