//! Service statistics tracking.
//!
//! Thread-safe counters for errors, warnings, and informational metrics,
//! shared across tasks behind an `Arc`. All counters exist from
//! construction so increments never allocate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;

use super::types::{ErrorType, InfoType, WarningType};

/// Thread-safe statistics tracker for the POI service.
///
/// - **Errors**: upstream/cache failures
/// - **Warnings**: degraded-but-handled conditions (stale data served, ...)
/// - **Info**: notable events that are neither (cache hits, fetches)
pub struct ServiceStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    warnings: HashMap<WarningType, AtomicUsize>,
    info: HashMap<InfoType, AtomicUsize>,
}

impl ServiceStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        let mut warnings = HashMap::new();
        for warning in WarningType::iter() {
            warnings.insert(warning, AtomicUsize::new(0));
        }

        let mut info = HashMap::new();
        for info_type in InfoType::iter() {
            info.insert(info_type, AtomicUsize::new(0));
        }

        ServiceStats {
            errors,
            warnings,
            info,
        }
    }

    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_warning(&self, warning: WarningType) {
        if let Some(counter) = self.warnings.get(&warning) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_info(&self, info: InfoType) {
        if let Some(counter) = self.info.get(&info) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    pub fn get_warning_count(&self, warning: WarningType) -> usize {
        self.warnings
            .get(&warning)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    pub fn get_info_count(&self, info: InfoType) -> usize {
        self.info
            .get(&info)
            .map_or(0, |c| c.load(Ordering::Relaxed))
    }

    /// Total failures across all error categories.
    pub fn total_errors(&self) -> usize {
        self.errors
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }
}

impl Default for ServiceStats {
    fn default() -> Self {
        Self::new()
    }
}
