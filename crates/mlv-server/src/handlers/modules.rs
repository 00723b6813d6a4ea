//! Module pages API endpoint.
//!
//! Resolves `/api/modules/{path}` against the site and returns the page as
//! JSON, or the redirect the route matcher chose.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use mlv_site::{MODULES_PREFIX, Resolution, ResolveError};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /api/modules/{path}.
pub(crate) async fn get_module(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let url_path = format!("{MODULES_PREFIX}/{}", path.trim_matches('/'));
    let resolution = state.site.resolve(&url_path).map_err(|e| match e {
        ResolveError::NotFound(_) => ServerError::NotFound(url_path.clone()),
        other => other.into(),
    })?;

    if let Resolution::Redirect {
        location,
        permanent,
    } = &resolution
    {
        return Ok(redirect_response(location, *permanent, &resolution));
    }

    let body = serde_json::to_string(&resolution)?;
    let etag = compute_etag(&state.version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::ETAG, etag),
            (header::CONTENT_TYPE, "application/json".to_owned()),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        body,
    )
        .into_response())
}

/// 308 for permanent moves, 307 otherwise, with the resolution as body.
fn redirect_response(location: &str, permanent: bool, resolution: &Resolution) -> Response {
    let status = if permanent {
        StatusCode::PERMANENT_REDIRECT
    } else {
        StatusCode::TEMPORARY_REDIRECT
    };
    let Ok(location) = HeaderValue::from_str(location) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    (status, [(header::LOCATION, location)], axum::Json(resolution)).into_response()
}

/// Compute `ETag` from version and body.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
