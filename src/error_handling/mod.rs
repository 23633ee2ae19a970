//! Error handling and service statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, cache, and fetch paths
//! - Categorization of fetch failures into counter buckets
//! - Service statistics tracking (errors, warnings, info metrics)
//!
//! The fetch-path errors are deliberately never surfaced to UI-facing
//! methods: failures degrade to stale data or empty lists with a logged
//! warning.

mod categorization;
mod stats;
mod types;

pub use categorization::categorize_fetch_error;
pub use stats::ServiceStats;
pub use types::{
    CacheError, ErrorType, FetchError, InfoType, InitializationError, WarningType,
};
