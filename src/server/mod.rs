//! HTTP API over the cached record lookups.
//!
//! ## Routes
//!
//! - `GET /api/{groupSlug}/latest[?fresh=true]`
//! - `GET /api/{groupSlug}/{eventId}[?fresh=true]`
//! - `GET /api/{groupSlug}[?fresh=true]`
//!
//! Every response, errors included, is JSON.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{AppError, Result};
use crate::services::RecordService;

/// Content type of every API response.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Build the axum Router with all API endpoints.
pub fn router(records: RecordService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/:slug/latest", get(latest_event))
        .route("/api/:slug/:event_id", get(event_by_id))
        .route("/api/:slug", get(group))
        .fallback(not_found)
        .layer(cors)
        .with_state(records)
}

/// Serve the API on `bind` until the process stops.
pub async fn serve(bind: &str, records: RecordService) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(records)).await?;
    Ok(())
}

/// Whether the query string asks to skip the cache.
///
/// `fresh=true` or `fresh=1`; when repeated, the last occurrence wins.
fn bypass_cache(query: Option<&str>) -> bool {
    query
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(name, _)| name == "fresh")
                .last()
                .is_some_and(|(_, value)| value == "true" || value == "1")
        })
        .unwrap_or(false)
}

async fn latest_event(
    State(records): State<RecordService>,
    slug: std::result::Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Response {
    let Path(slug) = match slug {
        Ok(slug) => slug,
        Err(rejection) => return bad_request(rejection),
    };
    respond(records.latest(&slug, bypass_cache(query.as_deref())).await)
}

async fn event_by_id(
    State(records): State<RecordService>,
    ids: std::result::Result<Path<(String, String)>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Response {
    let Path((slug, event_id)) = match ids {
        Ok(ids) => ids,
        Err(rejection) => return bad_request(rejection),
    };
    respond(
        records
            .event(&slug, &event_id, bypass_cache(query.as_deref()))
            .await,
    )
}

async fn group(
    State(records): State<RecordService>,
    slug: std::result::Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Response {
    let Path(slug) = match slug {
        Ok(slug) => slug,
        Err(rejection) => return bad_request(rejection),
    };
    respond(records.group(&slug, bypass_cache(query.as_deref())).await)
}

/// Malformed path parameters, answered in the same JSON shape as other errors.
fn bad_request(rejection: PathRejection) -> Response {
    log::debug!("Rejected request: {}", rejection.body_text());
    json_response(StatusCode::BAD_REQUEST, error_body("Invalid request."))
}

async fn not_found() -> Response {
    json_response(StatusCode::NOT_FOUND, error_body("Not found."))
}

fn respond(result: Result<String>) -> Response {
    match result {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(e) => {
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                log::error!("Request failed: {}", e);
            }
            json_response(status, error_body(&e.public_message()))
        }
    }
}

fn error_body(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

fn json_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        respond(Err(self))
    }
}
