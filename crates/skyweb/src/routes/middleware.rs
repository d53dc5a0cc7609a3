//! Request middleware applied to every route.

use std::time::Instant;

use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// `Strict-Transport-Security` value: one year.
pub const HSTS: &str = "max-age=31536000";

/// Log one line per request. Static assets are not logged.
pub async fn log_requests(request: Request, next: Next) -> Response {
    if request.uri().path().starts_with("/static") {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        method = %method,
        path = %uri,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    response
}

/// Redirect (302) paths with trailing slashes to the same path without them.
///
/// No route ends in a slash, so this only ever moves a request toward a
/// route in the table. The query string is kept.
pub async fn redirect_trailing_slash(request: Request, next: Next) -> Response {
    match strip_trailing_slash(request.uri().path()) {
        Some(target) => {
            let location = match request.uri().query() {
                Some(query) => format!("{target}?{query}"),
                None => target,
            };
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        None => next.run(request).await,
    }
}

/// Path with trailing slashes removed, or `None` if there are none to remove.
///
/// Leading slashes are collapsed so the redirect target can never be read as
/// a scheme-relative URL pointing at another host.
fn strip_trailing_slash(path: &str) -> Option<String> {
    if path == "/" || !path.ends_with('/') {
        return None;
    }

    let trimmed = path.trim_end_matches('/').trim_start_matches('/');
    Some(format!("/{trimmed}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slashes() {
        assert_eq!(strip_trailing_slash("/search/").as_deref(), Some("/search"));
        assert_eq!(
            strip_trailing_slash("/profile/alice.test///").as_deref(),
            Some("/profile/alice.test")
        );
        assert_eq!(strip_trailing_slash("//").as_deref(), Some("/"));
    }

    #[test]
    fn leaves_canonical_paths_alone() {
        assert_eq!(strip_trailing_slash("/"), None);
        assert_eq!(strip_trailing_slash("/search"), None);
        assert_eq!(strip_trailing_slash("/profile/alice.test/post/3k2x"), None);
    }

    #[test]
    fn never_produces_scheme_relative_target() {
        assert_eq!(
            strip_trailing_slash("//evil.example/").as_deref(),
            Some("/evil.example")
        );
    }
}
