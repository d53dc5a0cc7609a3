//! Skyweb - server-rendered public pages for a federated social network.
//!
//! This crate serves the HTML shell of the web app (home, profiles, posts,
//! support pages). Profile and post pages are hydrated on the server with
//! data fetched from the upstream AT Protocol API so link previews and
//! crawlers see real metadata; the client script takes over after load.
//!
//! # Architecture
//!
//! - **Upstream**: One authenticated XRPC session, created at startup and
//!   shared read-only by every request
//! - **Hydrate**: Per-page data fetching into a [`RenderContext`]; upstream
//!   failures degrade the context, never the response status
//! - **Render**: Named minijinja templates, bundled or read from disk
//! - **Error**: Framework errors rendered through `error.html`
//!
//! # Security
//!
//! - All template output is HTML-escaped
//! - `X-Content-Type-Options: nosniff`, `X-Frame-Options: SAMEORIGIN`, and
//!   one-year HSTS on every response

pub mod assets;
pub mod config;
pub mod context;
pub mod error;
pub mod hydrate;
pub mod render;
pub mod routes;
pub mod state;
pub mod templates;
pub mod upstream;
pub mod waitlist;

pub use config::Config;
pub use context::RenderContext;
pub use routes::router;
pub use state::AppState;
