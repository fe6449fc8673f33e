#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Admission control for sighting submissions.
//!
//! A submission is accepted only if its coordinate lies within a circular
//! region around a configured center. Distance is great-circle via the
//! Haversine formula, which is plenty accurate at the few-mile radii this
//! system fences.

use sighting_map_models::GeofenceConfig;

/// Mean Earth radius in miles.
const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance in miles between two coordinates.
///
/// Symmetric in its arguments, and exactly `0.0` for identical points
/// since both angular differences vanish. Coordinate magnitudes are not
/// validated; range checks are the caller's concern.
#[must_use]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Whether a coordinate lies within the configured fence.
///
/// The boundary is inclusive: a point at exactly `radius_miles` from the
/// center is admitted.
#[must_use]
pub fn is_within(lat: f64, lon: f64, config: &GeofenceConfig) -> bool {
    distance_miles(lat, lon, config.center_lat, config.center_lon) <= config.radius_miles
}

/// Loads the geofence configuration from the environment.
///
/// Reads `GEOFENCE_CENTER_LAT`, `GEOFENCE_CENTER_LON`,
/// `GEOFENCE_RADIUS_MILES`, and `GEOFENCE_GEONAME`, falling back to the
/// Springfield defaults (38.5, -117.0, 3 miles) for anything unset or
/// unparseable. Call once at startup and pass the result around; nothing
/// re-reads the environment per request.
#[must_use]
pub fn config_from_env() -> GeofenceConfig {
    let config = GeofenceConfig {
        center_lat: env_f64("GEOFENCE_CENTER_LAT", 38.5),
        center_lon: env_f64("GEOFENCE_CENTER_LON", -117.0),
        radius_miles: env_f64("GEOFENCE_RADIUS_MILES", 3.0),
        geoname: std::env::var("GEOFENCE_GEONAME").unwrap_or_else(|_| "Springfield".to_string()),
    };

    log::info!(
        "Geofence: {} mile radius around ({}, {}) [{}]",
        config.radius_miles,
        config.center_lat,
        config.center_lon,
        config.geoname
    );

    config
}

fn env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn springfield() -> GeofenceConfig {
        GeofenceConfig {
            center_lat: 38.5,
            center_lon: -117.0,
            radius_miles: 3.0,
            geoname: "Springfield".to_string(),
        }
    }

    #[test]
    fn identical_points_are_zero_distance() {
        assert_eq!(distance_miles(38.5, -117.0, 38.5, -117.0), 0.0);
        assert_eq!(distance_miles(-33.87, 151.21, -33.87, 151.21), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_miles(38.5, -117.0, 41.8781, -87.6298);
        let ba = distance_miles(41.8781, -87.6298, 38.5, -117.0);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_69_miles() {
        let d = distance_miles(38.0, -117.0, 39.0, -117.0);
        assert!((d - 69.1).abs() < 0.1, "got {d}");
    }

    #[test]
    fn point_one_mile_north_is_within() {
        assert!(is_within(38.5145, -117.0, &springfield()));
    }

    #[test]
    fn point_ten_miles_north_is_outside() {
        assert!(!is_within(38.645, -117.0, &springfield()));
    }

    #[test]
    fn boundary_is_inclusive() {
        let config = springfield();
        let lat = 38.54;
        let d = distance_miles(lat, -117.0, config.center_lat, config.center_lon);

        let at_boundary = GeofenceConfig {
            radius_miles: d,
            ..config.clone()
        };
        assert!(is_within(lat, -117.0, &at_boundary));

        let just_under = GeofenceConfig {
            radius_miles: d - 1e-9,
            ..config
        };
        assert!(!is_within(lat, -117.0, &just_under));
    }

    #[test]
    fn env_defaults_apply_when_unset() {
        let config = config_from_env();
        assert!((config.center_lat - 38.5).abs() < f64::EPSILON);
        assert!((config.center_lon - -117.0).abs() < f64::EPSILON);
        assert!((config.radius_miles - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.geoname, "Springfield");
    }
}
