//! Warning sinks and statistics.
//!
//! Data warnings travel out-of-band: the row sequence never contains them.
//! A [`WarningSink`] receives each one as it happens.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use strum::IntoEnumIterator;

use super::types::{DataWarning, WarningKind};

/// Receiver of recoverable data warnings.
pub trait WarningSink {
    fn warn(&mut self, warning: &DataWarning);
}

/// Default sink: reports every warning through `log::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWarnings;

impl WarningSink for LogWarnings {
    fn warn(&mut self, warning: &DataWarning) {
        log::warn!("{warning}");
    }
}

impl WarningSink for Sender<DataWarning> {
    fn warn(&mut self, warning: &DataWarning) {
        // The receiver going away only means nobody is listening any more.
        let _ = self.send(warning.clone());
    }
}

/// Thread-safe warning counters, one per [`WarningKind`].
///
/// Every kind is initialized to zero on creation. Share it through `Arc`;
/// `Arc<WarningStats>` is itself a sink and also forwards each warning to the
/// log.
pub struct WarningStats {
    warnings: HashMap<WarningKind, AtomicUsize>,
}

impl WarningStats {
    pub fn new() -> Self {
        let mut warnings = HashMap::new();
        for kind in WarningKind::iter() {
            warnings.insert(kind, AtomicUsize::new(0));
        }
        WarningStats { warnings }
    }

    pub fn increment(&self, kind: WarningKind) {
        if let Some(counter) = self.warnings.get(&kind) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.warnings
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

impl Default for WarningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningSink for Arc<WarningStats> {
    fn warn(&mut self, warning: &DataWarning) {
        self.increment(warning.kind);
        log::warn!("{warning}");
    }
}
