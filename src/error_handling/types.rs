//! Error type definitions.
//!
//! Structured errors for initialization, cache and fetch paths, plus the
//! counter enums tracked by [`super::ServiceStats`].

use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for service construction failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error building the shared HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error opening or creating the cache database.
    #[error("Cache database initialization error: {0}")]
    DatabaseError(#[from] CacheError),

    /// Error applying the cache schema migrations.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

/// Error types for durable-tier cache operations.
///
/// These never reach the fetch path's callers: a failing durable tier
/// degrades the cache to memory-only with a logged warning.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Error creating the database file.
    #[error("Cache database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Cached payload could not be (de)serialized.
    #[error("Cache payload serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Error types for upstream query failures.
///
/// All variants are recoverable from the caller's point of view: the
/// fetcher maps them to a stale-cache fallback or an empty result.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read, decode).
    #[error("HTTP request error: {0}")]
    RequestError(#[from] ReqwestError),

    /// Upstream answered with a non-success status.
    #[error("upstream returned HTTP {0}")]
    StatusError(reqwest::StatusCode),

    /// Upstream body was not the expected JSON shape.
    #[error("upstream payload parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Categories of upstream/cache failures, counted for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    UpstreamTimeout,
    UpstreamConnect,
    UpstreamStatus,
    UpstreamTooManyRequests,
    UpstreamDecode,
    UpstreamOther,
    CacheReadError,
    CacheWriteError,
}

/// Degraded-but-handled conditions worth surfacing in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    /// A filter id with no Overpass query mapping was requested.
    UnknownFilter,
    /// An expired cache entry was served because the upstream failed.
    StaleCacheServed,
    /// Upstream failed and no stale data existed; an empty list was returned.
    NoDataAvailable,
}

/// Informational metrics (not failures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// A valid cache entry short-circuited a fetch.
    CacheHit,
    /// A network fetch completed and was cached.
    UpstreamFetch,
    /// A geocoding search was dispatched.
    SearchRequest,
    /// A reverse-geocoding lookup was dispatched.
    ReverseGeocode,
}
