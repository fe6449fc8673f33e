#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SQLite-backed storage and query logic for sightings.
//!
//! Uses `switchy_database` with the `rusqlite` backend for all database
//! operations. Timestamps are stored as RFC 3339 UTC text at fixed
//! precision, so lexicographic range comparisons in SQL match
//! chronological order.

pub mod db;
pub mod queries;

use sighting_map_timezone::DateRangeError;

/// Errors from sighting storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required input field was missing or malformed. Caller error,
    /// not retryable.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The submitted coordinate lies outside the configured geofence.
    /// Carries the fence label and radius for a human-readable message.
    #[error("Location is outside the {geoname} area ({radius_miles} mile radius)")]
    OutOfBounds {
        /// Display label of the fenced area.
        geoname: String,
        /// Configured admission radius in miles.
        radius_miles: f64,
    },

    /// The date filter could not be resolved to a UTC range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be converted back into a sighting.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
