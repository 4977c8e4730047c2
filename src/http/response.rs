//! Response construction.
//!
//! # Responsibilities
//! - Turn a resolved target into a redirect with a `Location` header
//! - Map NotFound to 404 and source failures to 502
//!
//! # Design Decisions
//! - Redirect status is configurable (301 by default)
//! - Targets are ASCII after URL parsing; a header conversion failure is
//!   still handled and reported as 500

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::shortcuts::RedirectTarget;

/// Redirect to `target` with the given status.
pub fn redirect(status: StatusCode, target: &RedirectTarget) -> Response {
    match HeaderValue::from_str(target.as_str()) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!(target = %target, error = %e, "Redirect target is not a valid header value");
            (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target").into_response()
        }
    }
}

/// No shortcut matched the path.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

/// The shortcut sheet could not be read.
pub fn upstream_unavailable() -> Response {
    (StatusCode::BAD_GATEWAY, "Shortcut table unavailable").into_response()
}
