//! Wire types for the XRPC endpoints the web front end reads.
//!
//! Only the fields the server inspects are typed. Everything else the
//! upstream returns is kept in `extra` so templates see the full object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `$type` of a thread node that carries a post.
pub const THREAD_VIEW_POST: &str = "app.bsky.feed.defs#threadViewPost";

/// `$type` of an image gallery embed view.
pub const EMBED_IMAGES_VIEW: &str = "app.bsky.embed.images#view";

/// Request body for `com.atproto.server.createSession`.
#[derive(Debug, Serialize)]
pub struct CreateSessionInput<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

/// Response body for `com.atproto.server.createSession`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionOutput {
    pub access_jwt: String,
    pub refresh_jwt: String,
    pub did: String,
    pub handle: String,
}

/// Error body returned by XRPC endpoints on non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct XrpcErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `app.bsky.actor.defs#profileViewDetailed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub did: String,
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `app.bsky.feed.defs#postView`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub uri: String,
    pub cid: String,
    pub author: Value,
    pub record: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<EmbedView>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PostView {
    /// Thumbnail of the first image, when the post embeds an image gallery.
    pub fn first_image_thumb(&self) -> Option<&str> {
        let embed = self.embed.as_ref()?;
        if embed.kind != EMBED_IMAGES_VIEW {
            return None;
        }
        embed.images.first().map(|image| image.thumb.as_str())
    }
}

/// Embed attached to a post view. Only image galleries are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedView {
    #[serde(rename = "$type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageView>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `app.bsky.embed.images#viewImage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub thumb: String,
    pub fullsize: String,
    #[serde(default)]
    pub alt: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response body for `app.bsky.feed.getPostThread`.
#[derive(Debug, Deserialize)]
pub struct PostThreadOutput {
    pub thread: Value,
}
