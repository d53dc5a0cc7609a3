//! Route table and middleware stack.
//!
//! ## Routes
//!
//! - `GET /robots.txt`, `GET /static/*` - Static assets
//! - `GET /` - Home page
//! - `GET /search`, `/notifications`, `/moderation/*`, `/settings/*`,
//!   `/sys/*`, `/support/*` - Generic page shell
//! - `GET /profile/{handle}` - Profile page (hydrated)
//! - `GET /profile/{handle}/follows|followers`, `/lists/{rkey}` - Generic page shell
//! - `GET /profile/{handle}/post/{rkey}` - Post page (hydrated)
//! - `GET /profile/{handle}/post/{rkey}/liked-by|reposted-by` - Generic page shell
//! - `POST /api/waitlist` - Waitlist signup (JSON)
//!
//! ## Middleware (outermost first)
//!
//! 1. Security headers
//! 2. Request logging (skips `/static`)
//! 3. Trailing-slash redirect
//! 4. Error responder

mod middleware;
mod pages;
mod waitlist;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Uri, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::assets;
use crate::error::{PageError, render_errors};
use crate::state::AppState;

pub use waitlist::MAX_BODY_BYTES;

/// Paths rendered as a bare page shell with no server-side data.
pub const GENERIC_ROUTES: &[&str] = &[
    "/search",
    "/notifications",
    "/moderation",
    "/moderation/mute-lists",
    "/moderation/mute-keywords",
    "/moderation/muted-accounts",
    "/moderation/blocked-accounts",
    "/settings",
    "/settings/app-passwords",
    "/sys/debug",
    "/sys/log",
    "/support",
    "/support/privacy",
    "/support/tos",
    "/support/community-guidelines",
    "/support/copyright",
    // Profile and post sub-pages: parameters are read client-side.
    "/profile/{handle}/follows",
    "/profile/{handle}/followers",
    "/profile/{handle}/lists/{rkey}",
    "/profile/{handle}/post/{rkey}/liked-by",
    "/profile/{handle}/post/{rkey}/reposted-by",
];

/// Build the complete web front end router.
pub fn router(state: AppState) -> Router {
    let mut routes = Router::new()
        .route("/", get(pages::home))
        .route("/profile/{handle}", get(pages::profile))
        .route("/profile/{handle}/post/{rkey}", get(pages::post))
        .route(
            "/api/waitlist",
            post(waitlist::join).layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        );

    for path in GENERIC_ROUTES {
        routes = routes.route(path, get(pages::generic));
    }

    routes
        .merge(assets::routes(state.config.debug, &state.config.static_dir))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::STRICT_TRANSPORT_SECURITY,
                    HeaderValue::from_static(middleware::HSTS),
                ))
                .layer(from_fn(middleware::log_requests))
                .layer(from_fn(middleware::redirect_trailing_slash))
                .layer(from_fn_with_state(state.clone(), render_errors)),
        )
        .with_state(state)
}

async fn not_found(uri: Uri) -> PageError {
    PageError::NotFound(uri.path().to_string())
}
