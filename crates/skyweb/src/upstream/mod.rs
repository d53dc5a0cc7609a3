//! Client for the upstream AT Protocol API.
//!
//! The server authenticates once at startup as a service account and then
//! reads profiles and post threads on behalf of anonymous visitors.
//!
//! # Lifecycle
//!
//! ```text
//! XrpcClient::new(host)            unauthenticated
//!     .create_session(id, secret)  credential exchange (fatal on failure)
//!     -> Session                   immutable, shared by every request
//! ```

mod types;
mod xrpc;

use async_trait::async_trait;

pub use types::{PostView, ProfileView};
pub use xrpc::{AuthInfo, Session, XrpcClient};

/// Errors from upstream API calls.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("{method} failed with status {status}: {error}: {message}")]
    Status {
        method: &'static str,
        status: u16,
        error: String,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("{method} returned an unexpected body: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The thread root is not a viewable post (not found, blocked, ...).
    #[error("thread for {uri} is not a post view (got {kind})")]
    UnexpectedThread { uri: String, kind: String },
}

/// Read-only view of the upstream API used by the page hydrators.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Resolve a profile by handle or DID (`app.bsky.actor.getProfile`).
    async fn get_profile(&self, actor: &str) -> Result<ProfileView, UpstreamError>;

    /// Fetch a post thread with `depth` levels of replies
    /// (`app.bsky.feed.getPostThread`) and return its root post.
    async fn get_post_thread(&self, uri: &str, depth: u32) -> Result<PostView, UpstreamError>;
}

/// Collection NSID for posts.
pub const POST_COLLECTION: &str = "app.bsky.feed.post";

/// Build the AT-URI of a post record.
pub fn post_uri(did: &str, rkey: &str) -> String {
    format!("at://{did}/{POST_COLLECTION}/{rkey}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_uri_format() {
        assert_eq!(
            post_uri("did:plc:xyz", "3k2x"),
            "at://did:plc:xyz/app.bsky.feed.post/3k2x"
        );
    }

    #[test]
    fn status_error_display() {
        let err = UpstreamError::Status {
            method: "app.bsky.actor.getProfile",
            status: 400,
            error: "InvalidRequest".to_string(),
            message: "Profile not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "app.bsky.actor.getProfile failed with status 400: InvalidRequest: Profile not found"
        );
    }
}
