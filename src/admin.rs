//! Administrative gate
//!
//! A UI mode flag unlocked by a static shared passcode. It is not an
//! authorization boundary: storage itself is never protected. While the gate
//! is open it hands out [`AdminCapability`] values, and the roster only
//! exposes `remove` and `clear` to holders of one.

use std::marker::PhantomData;
use tracing::{info, warn};

use crate::error::{RosterError, Result};

/// Proof that admin mode was active when it was obtained
///
/// Borrows the gate, so the gate cannot be closed while one is alive.
#[derive(Debug)]
pub struct AdminCapability<'a> {
    _gate: PhantomData<&'a AdminGate>,
}

/// Static-secret admin mode toggle
#[derive(Debug)]
pub struct AdminGate {
    passcode: String,
    active: bool,
}

impl AdminGate {
    /// Create a closed gate for `passcode`
    pub fn new(passcode: impl Into<String>) -> Self {
        Self {
            passcode: passcode.into(),
            active: false,
        }
    }

    /// Open the gate if `attempt` matches exactly
    pub fn login(&mut self, attempt: &str) -> Result<()> {
        if attempt == self.passcode {
            self.active = true;
            info!("Admin mode enabled");
            Ok(())
        } else {
            warn!("Rejected admin passcode attempt");
            Err(RosterError::InvalidPasscode)
        }
    }

    /// Close the gate
    pub fn logout(&mut self) {
        if self.active {
            info!("Admin mode disabled");
        }
        self.active = false;
    }

    /// Whether admin mode is on
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Capability for admin-only roster operations, if the gate is open
    pub fn capability(&self) -> Option<AdminCapability<'_>> {
        self.active.then(|| AdminCapability { _gate: PhantomData })
    }

    /// Like [`capability`](Self::capability) but as an error
    pub fn require(&self) -> Result<AdminCapability<'_>> {
        self.capability().ok_or(RosterError::AdminRequired)
    }
}

/// Operator confirmation for destructive actions
pub trait Confirm {
    /// Ask the operator; `true` means proceed
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
