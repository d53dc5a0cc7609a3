//! Data hydration for page routes.
//!
//! Each hydrator turns path parameters into a [`RenderContext`]. Upstream
//! failures never become error responses: they are logged and the context
//! is left with whatever was fetched before the failure, so the page shell
//! still loads and the client script fills in the rest.
//!
//! Context keys read by the templates:
//!
//! | Key | Set by | Value |
//! |---|---|---|
//! | `did` | profile, post | resolved account DID |
//! | `profileView` | profile | upstream profile view |
//! | `postView` | post | upstream post view |
//! | `requestURI` | profile, post | canonical `https://` URL of the request |
//! | `imgThumbUrl` | post | first image thumbnail, if the post has an image gallery |

use crate::context::RenderContext;
use crate::upstream::{self, Upstream};

/// Reply depth requested with a post thread.
pub const THREAD_DEPTH: u32 = 1;

/// Coarse shape check for a handle path parameter.
pub fn valid_handle(handle: &str) -> bool {
    handle.len() > 4 && handle.len() < 128
}

/// Coarse shape check for a record key path parameter.
pub fn valid_rkey(rkey: &str) -> bool {
    !rkey.is_empty()
}

/// Canonical URL of the current request, used in link preview metadata.
pub fn request_uri(host: &str, path: &str) -> String {
    format!("https://{host}{path}")
}

/// Context for pages with no server-side data.
pub fn generic() -> RenderContext {
    RenderContext::new()
}

/// Hydrate a profile page: one profile lookup by handle.
pub async fn profile(upstream: &dyn Upstream, handle: &str, request_uri: &str) -> RenderContext {
    let mut ctx = RenderContext::new();
    if !valid_handle(handle) {
        tracing::debug!(handle, "skipping profile fetch for malformed handle");
        return ctx;
    }

    match upstream.get_profile(handle).await {
        Ok(profile) => {
            ctx.insert("did", &profile.did);
            ctx.insert("profileView", &profile);
            ctx.insert("requestURI", request_uri);
        }
        Err(err) => {
            tracing::warn!(handle, error = %err, "failed to fetch handle");
        }
    }

    ctx
}

/// Hydrate a post page: resolve the author, then fetch the thread.
///
/// The thread fetch needs the DID from the profile lookup, so it is never
/// attempted when the lookup fails.
pub async fn post(
    upstream: &dyn Upstream,
    handle: &str,
    rkey: &str,
    request_uri: &str,
) -> RenderContext {
    let mut ctx = RenderContext::new();
    if !valid_handle(handle) || !valid_rkey(rkey) {
        tracing::debug!(handle, rkey, "skipping post fetch for malformed parameters");
        return ctx;
    }

    let did = match upstream.get_profile(handle).await {
        Ok(profile) => profile.did,
        Err(err) => {
            tracing::warn!(handle, error = %err, "failed to fetch handle");
            return ctx;
        }
    };
    ctx.insert("did", &did);

    let uri = upstream::post_uri(&did, rkey);
    match upstream.get_post_thread(&uri, THREAD_DEPTH).await {
        Ok(post) => {
            if let Some(thumb) = post.first_image_thumb() {
                ctx.insert("imgThumbUrl", thumb);
            }
            ctx.insert("postView", &post);
            ctx.insert("requestURI", request_uri);
        }
        Err(err) => {
            tracing::warn!(uri = %uri, error = %err, "failed to fetch post");
        }
    }

    ctx
}


#[cfg(test)]
mod tests {
    use super::testing::FakeUpstream;
    use super::*;

    const POST_URI: &str = "at://did:plc:xyz/app.bsky.feed.post/3k2x";
    const PROFILE_URL: &str = "https://example.test/profile/alice.test";
    const POST_URL: &str = "https://example.test/profile/alice.test/post/3k2x";

    #[test]
    fn handle_bounds() {
        assert!(!valid_handle(""));
        assert!(!valid_handle("ab"));
        assert!(!valid_handle("abcd"));
        assert!(valid_handle("abcde"));
        assert!(valid_handle(&"a".repeat(127)));
        assert!(!valid_handle(&"a".repeat(128)));
    }

    #[test]
    fn request_uri_is_https() {
        assert_eq!(
            request_uri("example.test", "/profile/alice.test"),
            PROFILE_URL
        );
    }

    #[tokio::test]
    async fn profile_populates_context() {
        let upstream = FakeUpstream::default().with_profile("alice.test", "did:plc:xyz");
        let ctx = profile(&upstream, "alice.test", PROFILE_URL).await;

        assert_eq!(ctx.get("did").unwrap(), "did:plc:xyz");
        assert_eq!(ctx.get("requestURI").unwrap(), PROFILE_URL);
        assert_eq!(ctx.get("profileView").unwrap()["handle"], "alice.test");
        assert_eq!(upstream.calls(), ["getProfile alice.test"]);
    }

    #[tokio::test]
    async fn profile_lookup_failure_leaves_context_empty() {
        let upstream = FakeUpstream::default();
        let ctx = profile(&upstream, "alice.test", PROFILE_URL).await;

        assert!(ctx.is_empty());
        assert_eq!(upstream.calls().len(), 1);
    }

    #[tokio::test]
    async fn malformed_handles_skip_upstream() {
        let upstream = FakeUpstream::default().with_profile("ab", "did:plc:short");
        let long = "a".repeat(128);

        for handle in ["", "ab", "abcd", long.as_str()] {
            assert!(profile(&upstream, handle, PROFILE_URL).await.is_empty());
            assert!(post(&upstream, handle, "3k2x", POST_URL).await.is_empty());
        }
        assert!(upstream.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_rkey_skips_upstream() {
        let upstream = FakeUpstream::default().with_profile("alice.test", "did:plc:xyz");
        let ctx = post(&upstream, "alice.test", "", POST_URL).await;

        assert!(ctx.is_empty());
        assert!(upstream.calls().is_empty());
    }

    #[tokio::test]
    async fn post_populates_context_with_thumbnail() {
        let upstream = FakeUpstream::default()
            .with_profile("alice.test", "did:plc:xyz")
            .with_post(
                POST_URI,
                serde_json::json!({
                    "$type": "app.bsky.embed.images#view",
                    "images": [{"thumb": "https://cdn.test/thumb", "fullsize": "https://cdn.test/full", "alt": ""}],
                }),
            );
        let ctx = post(&upstream, "alice.test", "3k2x", POST_URL).await;

        assert_eq!(ctx.get("did").unwrap(), "did:plc:xyz");
        assert_eq!(ctx.get("postView").unwrap()["uri"], POST_URI);
        assert_eq!(ctx.get("requestURI").unwrap(), POST_URL);
        assert_eq!(ctx.get("imgThumbUrl").unwrap(), "https://cdn.test/thumb");
        assert_eq!(
            upstream.calls(),
            [
                "getProfile alice.test".to_string(),
                format!("getPostThread {POST_URI} depth=1"),
            ]
        );
    }

    #[tokio::test]
    async fn post_without_images_has_no_thumbnail() {
        let upstream = FakeUpstream::default()
            .with_profile("alice.test", "did:plc:xyz")
            .with_post(POST_URI, serde_json::Value::Null);
        let ctx = post(&upstream, "alice.test", "3k2x", POST_URL).await;

        assert!(ctx.contains_key("postView"));
        assert!(!ctx.contains_key("imgThumbUrl"));
    }

    #[tokio::test]
    async fn post_profile_failure_never_fetches_thread() {
        let upstream = FakeUpstream::default().with_post(POST_URI, serde_json::Value::Null);
        let ctx = post(&upstream, "alice.test", "3k2x", POST_URL).await;

        assert!(ctx.is_empty());
        assert_eq!(upstream.calls(), ["getProfile alice.test"]);
    }

    #[tokio::test]
    async fn post_thread_failure_keeps_did_only() {
        let upstream = FakeUpstream::default().with_profile("alice.test", "did:plc:xyz");
        let ctx = post(&upstream, "alice.test", "3k2x", POST_URL).await;

        assert_eq!(ctx.keys().collect::<Vec<_>>(), ["did"]);
        assert_eq!(upstream.calls().len(), 2);
    }
}
