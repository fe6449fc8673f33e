#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared data types for the sighting map.
//!
//! These types are serialized to JSON for the REST API and shared between
//! the storage, geofence, and server crates. The field names match the
//! wire format the frontend consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reported sighting as returned to callers.
///
/// `sighted_age` and `reported_age` are derived at read time from the
/// instant of the read, so two reads of the same stored row may return
/// different values. They are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    /// Unique identifier, assigned by the store at creation.
    pub id: i64,
    /// Latitude in decimal degrees (WGS84).
    pub latitude: f64,
    /// Longitude in decimal degrees (WGS84).
    pub longitude: f64,
    /// When the observed event occurred (UTC), supplied by the reporter.
    pub sighted_at: DateTime<Utc>,
    /// When the record was created (UTC), stamped by the store.
    pub reported_at: DateTime<Utc>,
    /// Free-text description.
    pub details: String,
    /// Whole minutes elapsed since `sighted_at`, computed at read time.
    /// Slightly negative when the reporter claimed a near-future sighting.
    pub sighted_age: i64,
    /// Whole minutes elapsed since `reported_at`, computed at read time.
    pub reported_age: i64,
}

/// Caller-supplied fields for a new sighting.
///
/// `reported_at` is deliberately absent: the store stamps it from its own
/// clock at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSighting {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// When the event occurred, as an RFC 3339 instant string.
    pub sighted_at: String,
    /// Free-text description. Must be non-empty.
    pub details: String,
}

/// Circular admission boundary for new sightings.
///
/// Loaded once from the environment at process start and shared read-only
/// by all requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeofenceConfig {
    /// Latitude of the fence center in decimal degrees.
    pub center_lat: f64,
    /// Longitude of the fence center in decimal degrees.
    pub center_lon: f64,
    /// Admission radius in miles. Boundary is inclusive.
    pub radius_miles: f64,
    /// Display label for the fenced area, used in rejection messages.
    pub geoname: String,
}
