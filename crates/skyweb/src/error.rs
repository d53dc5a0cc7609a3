//! Error types and the error responder.
//!
//! Upstream failures never reach this module: hydrators absorb them into a
//! smaller render context. What lands here are framework and transport
//! errors (unmatched routes, rejected request bodies, template failures), which
//! are rendered through `error.html` with their status code.

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use maud::{DOCTYPE, html};

use crate::context::RenderContext;
use crate::state::AppState;
use crate::templates::Templates;

/// Errors surfaced to the client as a rendered error page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No route matches the request path.
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (template rendering, I/O, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PageError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Marker left on responses produced from a [`PageError`], carrying the
/// error text for the responder's log line.
#[derive(Debug, Clone)]
pub struct ErrorMarker(pub String);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let mut response = (self.status(), message.clone()).into_response();
        response.extensions_mut().insert(ErrorMarker(message));
        response
    }
}

/// Error responder middleware.
///
/// Replaces error responses with the rendered error page. JSON error
/// responses (the waitlist API) are left alone; everything else with a 4xx
/// or 5xx status, including rejections produced by axum itself, is
/// rendered.
pub async fn render_errors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let error = response
        .extensions()
        .get::<ErrorMarker>()
        .map(|marker| marker.0.clone())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    tracing::error!(
        method = %method,
        uri = %uri,
        status = status.as_u16(),
        error = %error,
        "request failed"
    );

    error_page(&state.templates, status)
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Render `error.html` for `status`, falling back to a built-in page when the
/// template itself cannot be rendered.
pub fn error_page(templates: &Templates, status: StatusCode) -> Response {
    let mut ctx = RenderContext::new();
    ctx.insert("statusCode", status.as_u16());

    match templates.render("error.html", &ctx) {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render error template");
            (status, Html(fallback_error_page(status))).into_response()
        }
    }
}

fn fallback_error_page(status: StatusCode) -> String {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="robots" content="noindex";
                title { "Error " (code) }
            }
            body {
                main class="error-page" {
                    h1 { (code) " " (reason) }
                    a href="/" { "Back to home" }
                }
            }
        }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            PageError::NotFound("/nope".to_string()).to_string(),
            "not found: /nope"
        );
        assert_eq!(
            PageError::Internal(anyhow::anyhow!("boom")).to_string(),
            "internal error: boom"
        );
    }

    #[test]
    fn error_into_response_status_and_marker() {
        let response = PageError::NotFound("/nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let marker = response.extensions().get::<ErrorMarker>().unwrap();
        assert_eq!(marker.0, "not found: /nope");

        let response = PageError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_page_uses_template() {
        let templates =
            Templates::from_sources([("error.html", "error {{ statusCode }}")]).unwrap();
        let response = error_page(&templates, StatusCode::NOT_FOUND);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn fallback_page_when_template_missing() {
        let body = fallback_error_page(StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body.contains("413 Payload Too Large"));

        let templates = Templates::from_sources(std::iter::empty()).unwrap();
        let response = error_page(&templates, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
