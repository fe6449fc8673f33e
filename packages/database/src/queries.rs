//! Query functions for sighting rows.
//!
//! The read path filters on `sighted_at`: either the UTC rendering of a
//! civil day resolved per-date from tzdata, or a rolling 24-hour window
//! anchored to the request instant when no date is given. The write path
//! runs every candidate coordinate through the geofence before inserting.

use chrono::{DateTime, Duration, DurationRound, SecondsFormat, Utc};
use moosicbox_json_utils::database::ToValue as _;
use sighting_map_models::{GeofenceConfig, NewSighting, Sighting};
use sighting_map_timezone::civil_day_range;
use switchy_database::{Database, DatabaseValue, Row};

use crate::StoreError;

/// Width of the default lookback window when no date filter is supplied.
const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Lists sightings, newest-day queries and rolling-window queries alike
/// ordered by `sighted_at` ascending with ties broken by id.
///
/// With a `date` (`YYYY-MM-DD`), returns rows whose `sighted_at` falls in
/// that civil day as experienced in `timezone`, resolved DST-correctly.
/// Without one, returns rows from the last 24 hours anchored to the
/// request instant. These are deliberately different semantics: a "today"
/// query and a no-date query generally disagree near date boundaries.
///
/// Every returned row carries age fields computed at this read.
///
/// # Errors
///
/// Returns [`StoreError::DateRange`] if the date or timezone is invalid,
/// or [`StoreError::Database`] if the query fails.
pub async fn list_sightings(
    db: &dyn Database,
    date: Option<&str>,
    timezone: &str,
) -> Result<Vec<Sighting>, StoreError> {
    let now = Utc::now();

    let rows = if let Some(date) = date {
        let (start, end) = civil_day_range(date, timezone)?;
        db.query_raw_params(
            "SELECT id, latitude, longitude, sighted_at, reported_at, details
             FROM sightings
             WHERE sighted_at >= $1 AND sighted_at < $2
             ORDER BY sighted_at, id",
            &[
                DatabaseValue::String(format_instant(start)),
                DatabaseValue::String(format_instant(end)),
            ],
        )
        .await?
    } else {
        let start = now - Duration::hours(DEFAULT_WINDOW_HOURS);
        db.query_raw_params(
            "SELECT id, latitude, longitude, sighted_at, reported_at, details
             FROM sightings
             WHERE sighted_at >= $1
             ORDER BY sighted_at, id",
            &[DatabaseValue::String(format_instant(start))],
        )
        .await?
    };

    rows.iter().map(|row| sighting_from_row(row, now)).collect()
}

/// Validates and persists a new sighting.
///
/// The coordinate must pass the geofence; `details` must be non-empty;
/// `sighted_at` must be a parseable RFC 3339 instant. `reported_at` is
/// stamped from the server clock, never taken from the caller. Returns
/// the stored entity with fresh age fields (both near zero; `sighted_age`
/// goes slightly negative for a near-future `sighted_at`, which is
/// allowed).
///
/// # Errors
///
/// Returns [`StoreError::Validation`] for missing or malformed input,
/// [`StoreError::OutOfBounds`] if the coordinate lies outside the fence,
/// or [`StoreError::Database`] if the insert fails.
pub async fn create_sighting(
    db: &dyn Database,
    config: &GeofenceConfig,
    input: &NewSighting,
) -> Result<Sighting, StoreError> {
    if input.details.trim().is_empty() {
        return Err(StoreError::Validation(
            "details must not be empty".to_string(),
        ));
    }

    let sighted_at = parse_instant(&input.sighted_at)
        .map(stored_precision)
        .ok_or_else(|| {
            StoreError::Validation(format!(
                "sighted_at is not a valid instant: {}",
                input.sighted_at
            ))
        })?;

    if !sighting_map_geofence::is_within(input.latitude, input.longitude, config) {
        return Err(StoreError::OutOfBounds {
            geoname: config.geoname.clone(),
            radius_miles: config.radius_miles,
        });
    }

    let now = stored_precision(Utc::now());

    let rows = db
        .query_raw_params(
            "INSERT INTO sightings (latitude, longitude, sighted_at, reported_at, details)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
            &[
                DatabaseValue::Real64(input.latitude),
                DatabaseValue::Real64(input.longitude),
                DatabaseValue::String(format_instant(sighted_at)),
                DatabaseValue::String(format_instant(now)),
                DatabaseValue::String(input.details.clone()),
            ],
        )
        .await?;

    let row = rows.first().ok_or_else(|| StoreError::Conversion {
        message: "Failed to get sighting id from insert".to_string(),
    })?;
    let id: i64 = row.to_value("id").map_err(|e| StoreError::Conversion {
        message: format!("Failed to parse sighting id: {e}"),
    })?;

    log::debug!(
        "Stored sighting {id} at ({}, {})",
        input.latitude,
        input.longitude
    );

    Ok(Sighting {
        id,
        latitude: input.latitude,
        longitude: input.longitude,
        sighted_at,
        reported_at: now,
        details: input.details.clone(),
        sighted_age: age_minutes(now, sighted_at),
        reported_age: age_minutes(now, now),
    })
}

/// Fetches a single sighting by id with fresh age fields, or `None` if
/// no such row exists. Absence is a normal outcome for the caller to
/// branch on, not a failure.
///
/// # Errors
///
/// Returns [`StoreError`] if the query fails or the row cannot be
/// converted.
pub async fn get_sighting_by_id(
    db: &dyn Database,
    id: i64,
) -> Result<Option<Sighting>, StoreError> {
    let rows = db
        .query_raw_params(
            "SELECT id, latitude, longitude, sighted_at, reported_at, details
             FROM sightings
             WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    rows.first()
        .map(|row| sighting_from_row(row, Utc::now()))
        .transpose()
}

/// Hard-deletes a sighting. Returns `true` if a row was removed, `false`
/// if it was already absent, so callers can map the second case to a 404.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the delete fails.
pub async fn delete_sighting_by_id(db: &dyn Database, id: i64) -> Result<bool, StoreError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM sightings WHERE id = $1",
            &[DatabaseValue::Int64(id)],
        )
        .await?;

    Ok(deleted > 0)
}

/// Renders a UTC instant as RFC 3339 text at fixed millisecond precision
/// with a `Z` suffix. All stored timestamps and all range bounds go
/// through here, keeping lexicographic and chronological order identical.
fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Truncates an instant to the millisecond precision the store persists,
/// so the entity returned from a write equals the row a later read sees.
fn stored_precision(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(Duration::milliseconds(1))
        .unwrap_or(instant)
}

/// Whole minutes from `then` to `now`, floored (a sighting 90 seconds in
/// the future reads as -2, matching floor division).
fn age_minutes(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_seconds().div_euclid(60)
}

fn sighting_from_row(row: &Row, now: DateTime<Utc>) -> Result<Sighting, StoreError> {
    let id: i64 = row.to_value("id").map_err(|e| StoreError::Conversion {
        message: format!("Failed to parse sighting id: {e}"),
    })?;
    let latitude: f64 = row.to_value("latitude").map_err(|e| StoreError::Conversion {
        message: format!("Failed to parse latitude: {e}"),
    })?;
    let longitude: f64 = row
        .to_value("longitude")
        .map_err(|e| StoreError::Conversion {
            message: format!("Failed to parse longitude: {e}"),
        })?;
    let details: String = row.to_value("details").map_err(|e| StoreError::Conversion {
        message: format!("Failed to parse details: {e}"),
    })?;

    let sighted_at_text: String =
        row.to_value("sighted_at")
            .map_err(|e| StoreError::Conversion {
                message: format!("Failed to parse sighted_at: {e}"),
            })?;
    let reported_at_text: String =
        row.to_value("reported_at")
            .map_err(|e| StoreError::Conversion {
                message: format!("Failed to parse reported_at: {e}"),
            })?;

    let sighted_at = parse_instant(&sighted_at_text).ok_or_else(|| StoreError::Conversion {
        message: format!("Stored sighted_at is not a valid instant: {sighted_at_text}"),
    })?;
    let reported_at = parse_instant(&reported_at_text).ok_or_else(|| StoreError::Conversion {
        message: format!("Stored reported_at is not a valid instant: {reported_at_text}"),
    })?;

    Ok(Sighting {
        id,
        latitude,
        longitude,
        sighted_at,
        reported_at,
        details,
        sighted_age: age_minutes(now, sighted_at),
        reported_age: age_minutes(now, reported_at),
    })
}
