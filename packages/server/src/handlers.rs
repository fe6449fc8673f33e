//! HTTP handler functions for the sighting map API.
//!
//! Handlers parse transport-level input, call into the store, and map
//! its outcomes to status codes: validation and range errors to 400,
//! geofence rejections to 400 with the configured area in the message,
//! absent rows to 404, storage failures to 500.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use sighting_map_database::{StoreError, queries};
use sighting_map_models::NewSighting;
use sighting_map_timezone::DEFAULT_TIMEZONE;

use crate::AppState;

/// Query parameters for the sightings list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Civil date filter (`YYYY-MM-DD`). Without it the endpoint returns
    /// the rolling last 24 hours instead.
    pub date: Option<String>,
    /// IANA timezone the date is experienced in.
    pub timezone: Option<String>,
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "healthy": true,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/config`
///
/// Returns the active geofence so the client can render the admission
/// boundary without re-deriving it.
pub async fn config(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.geofence)
}

/// `GET /api/sightings`
///
/// Lists sightings for a civil day in a timezone, or from the last 24
/// hours when no date is given.
pub async fn list_sightings(
    state: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> HttpResponse {
    let timezone = params.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);

    match queries::list_sightings(state.db.as_ref(), params.date.as_deref(), timezone).await {
        Ok(sightings) => HttpResponse::Ok().json(sightings),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/sightings`
pub async fn create_sighting(
    state: web::Data<AppState>,
    input: web::Json<NewSighting>,
) -> HttpResponse {
    match queries::create_sighting(state.db.as_ref(), &state.geofence, &input).await {
        Ok(sighting) => HttpResponse::Created().json(sighting),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/sightings/{id}`
pub async fn get_sighting(state: web::Data<AppState>, id: web::Path<i64>) -> HttpResponse {
    match queries::get_sighting_by_id(state.db.as_ref(), *id).await {
        Ok(Some(sighting)) => HttpResponse::Ok().json(sighting),
        Ok(None) => not_found(),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/sightings/{id}`
///
/// Admin-only: requires the `X-Admin-Token` header to match the
/// configured `ADMIN_TOKEN`.
pub async fn delete_sighting(
    state: web::Data<AppState>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> HttpResponse {
    if !admin_authorized(&state, &req) {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin token required"
        }));
    }

    match queries::delete_sighting_by_id(state.db.as_ref(), *id).await {
        Ok(true) => HttpResponse::NoContent().finish(),
        Ok(false) => not_found(),
        Err(e) => error_response(&e),
    }
}

/// Compares the request's `X-Admin-Token` header against the configured
/// token. Fails closed when no token is configured.
fn admin_authorized(state: &AppState, req: &HttpRequest) -> bool {
    let Some(expected) = state.admin_token.as_deref() else {
        return false;
    };

    req.headers()
        .get("X-Admin-Token")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|provided| provided == expected)
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Sighting not found"
    }))
}

/// Maps store errors to responses. Caller errors keep their message;
/// storage failures are logged and masked.
fn error_response(err: &StoreError) -> HttpResponse {
    match err {
        StoreError::Validation(_) | StoreError::OutOfBounds { .. } | StoreError::DateRange(_) => {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": err.to_string()
            }))
        }
        StoreError::Database(_) | StoreError::Io(_) | StoreError::Conversion { .. } => {
            log::error!("Sighting store failure: {err}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}
