//! Page handlers: hydrate a render context, then render one template.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Uri, header};
use axum::response::Html;

use crate::error::PageError;
use crate::hydrate;
use crate::render;
use crate::state::AppState;

/// `GET /`.
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render::page(&state.templates, "home.html", hydrate::generic())
}

/// Pages with no server-side data; the client script renders them.
pub async fn generic(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render::page(&state.templates, "base.html", hydrate::generic())
}

/// `GET /profile/{handle}`.
pub async fn profile(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Html<String>, PageError> {
    let request_uri = hydrate::request_uri(request_host(&headers, &uri), uri.path());
    let ctx = hydrate::profile(state.upstream.as_ref(), &handle, &request_uri).await;
    render::page(&state.templates, "profile.html", ctx)
}

/// `GET /profile/{handle}/post/{rkey}`.
pub async fn post(
    State(state): State<AppState>,
    Path((handle, rkey)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Html<String>, PageError> {
    let request_uri = hydrate::request_uri(request_host(&headers, &uri), uri.path());
    let ctx = hydrate::post(state.upstream.as_ref(), &handle, &rkey, &request_uri).await;
    render::page(&state.templates, "post.html", ctx)
}

/// Host the client addressed, from the `Host` header or the request target.
fn request_host<'a>(headers: &'a HeaderMap, uri: &'a Uri) -> &'a str {
    headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .unwrap_or_default()
}
