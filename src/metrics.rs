//! Registration metrics
//!
//! Counters and gauges rendered in Prometheus text format.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Counter metric (monotonically increasing)
pub struct Counter {
    value: AtomicU64,
    name: &'static str,
    help: &'static str,
}

impl Counter {
    /// Create a new counter
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            value: AtomicU64::new(0),
            name,
            help,
        }
    }

    /// Increment by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} counter\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Gauge metric (can go up or down)
pub struct Gauge {
    value: AtomicI64,
    name: &'static str,
    help: &'static str,
}

impl Gauge {
    /// Create a new gauge
    pub const fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            value: AtomicI64::new(0),
            name,
            help,
        }
    }

    /// Set value
    pub fn set(&self, val: i64) {
        self.value.store(val, Ordering::Relaxed);
    }

    /// Get current value
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Format as Prometheus metric
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP {} {}\n# TYPE {} gauge\n{} {}\n",
            self.name, self.help, self.name, self.name, self.get()
        )
    }
}

/// Process-wide registration metrics
pub mod standard {
    use super::*;

    pub static REGISTRATIONS: Counter = Counter::new(
        "studysync_registrations_total",
        "New records created by registration",
    );

    pub static DUPLICATE_LOOKUPS: Counter = Counter::new(
        "studysync_duplicate_lookups_total",
        "Registrations answered with an existing record",
    );

    pub static REJECTIONS: Counter = Counter::new(
        "studysync_rejections_total",
        "Registrations rejected for validation or capacity",
    );

    pub static ROSTER_SIZE: Gauge = Gauge::new(
        "studysync_roster_size",
        "Records currently on the roster",
    );
}

/// Render all standard metrics
pub fn gather() -> String {
    let mut output = String::new();

    output.push_str(&standard::REGISTRATIONS.to_prometheus());
    output.push_str(&standard::DUPLICATE_LOOKUPS.to_prometheus());
    output.push_str(&standard::REJECTIONS.to_prometheus());

    output.push_str(&standard::ROSTER_SIZE.to_prometheus());

    output
}
