//! Static assets: `/robots.txt` and `/static/*`.
//!
//! Release builds serve a bundle compiled into the binary; debug mode serves
//! straight from the static directory.

use std::path::Path as FsPath;

use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower_http::services::{ServeDir, ServeFile};

use crate::error::PageError;
use crate::state::AppState;

/// A file in the embedded bundle.
#[derive(Debug)]
pub struct Asset {
    pub path: &'static str,
    pub content_type: &'static str,
    pub body: &'static [u8],
}

/// Assets compiled into the binary, keyed by path relative to the static root.
const EMBEDDED: &[Asset] = &[
    Asset {
        path: "robots.txt",
        content_type: "text/plain; charset=utf-8",
        body: include_bytes!("../static/robots.txt"),
    },
    Asset {
        path: "css/skyweb.css",
        content_type: "text/css; charset=utf-8",
        body: include_bytes!("../static/css/skyweb.css"),
    },
    Asset {
        path: "js/skyweb.js",
        content_type: "text/javascript; charset=utf-8",
        body: include_bytes!("../static/js/skyweb.js"),
    },
];

const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";

/// Find an embedded asset by its path under the static root.
pub fn lookup(path: &str) -> Option<&'static Asset> {
    EMBEDDED.iter().find(|asset| asset.path == path)
}

/// Routes for static assets.
pub fn routes(debug: bool, static_dir: &FsPath) -> Router<AppState> {
    if debug {
        Router::new()
            .route_service("/robots.txt", ServeFile::new(static_dir.join("robots.txt")))
            .nest_service("/static", ServeDir::new(static_dir))
    } else {
        Router::new()
            .route("/robots.txt", get(robots_txt))
            .route("/static/{*path}", get(embedded_asset))
    }
}

async fn robots_txt() -> Result<Response, PageError> {
    serve("robots.txt")
}

async fn embedded_asset(Path(path): Path<String>) -> Result<Response, PageError> {
    serve(&path)
}

fn serve(path: &str) -> Result<Response, PageError> {
    let asset = lookup(path).ok_or_else(|| PageError::NotFound(format!("/static/{path}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(asset.content_type)),
            (header::CACHE_CONTROL, HeaderValue::from_static(ASSET_CACHE_CONTROL)),
        ],
        asset.body,
    )
        .into_response())
}
