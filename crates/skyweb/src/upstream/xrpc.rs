//! XRPC transport and the authenticated session.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::{
    CreateSessionInput, CreateSessionOutput, PostThreadOutput, PostView, ProfileView,
    THREAD_VIEW_POST, XrpcErrorBody,
};
use super::{Upstream, UpstreamError};

const CREATE_SESSION: &str = "com.atproto.server.createSession";
const GET_PROFILE: &str = "app.bsky.actor.getProfile";
const GET_POST_THREAD: &str = "app.bsky.feed.getPostThread";

/// Unauthenticated XRPC client bound to one host.
#[derive(Debug, Clone)]
pub struct XrpcClient {
    http: reqwest::Client,
    host: String,
}

impl XrpcClient {
    /// Create a client for `host` (e.g. "https://bsky.social").
    pub fn new(host: impl Into<String>) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("skyweb/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            host: host.into().trim_end_matches('/').to_string(),
        })
    }

    /// Upstream host this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Exchange an identifier and secret for session credentials.
    ///
    /// Consumes the unauthenticated client; the returned [`Session`] is the
    /// only handle that can make authenticated calls.
    pub async fn create_session(
        self,
        identifier: &str,
        password: &str,
    ) -> Result<Session, UpstreamError> {
        let request = self
            .http
            .post(self.endpoint(CREATE_SESSION))
            .json(&CreateSessionInput {
                identifier,
                password,
            });
        let output: CreateSessionOutput = send(CREATE_SESSION, request).await?;

        Ok(Session {
            client: self,
            auth: AuthInfo {
                access_jwt: output.access_jwt,
                refresh_jwt: output.refresh_jwt,
                did: output.did,
                handle: output.handle,
            },
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/xrpc/{method}", self.host)
    }
}

/// Credentials and identity returned by the session exchange.
#[derive(Clone)]
pub struct AuthInfo {
    pub access_jwt: String,
    /// Stored but never used; the session is not refreshed.
    pub refresh_jwt: String,
    pub did: String,
    pub handle: String,
}

impl std::fmt::Debug for AuthInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInfo")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Authenticated, immutable upstream session.
#[derive(Debug, Clone)]
pub struct Session {
    client: XrpcClient,
    auth: AuthInfo,
}

impl Session {
    /// Identity the server is authenticated as.
    pub fn auth(&self) -> &AuthInfo {
        &self.auth
    }

    /// Upstream host of this session.
    pub fn host(&self) -> &str {
        self.client.host()
    }

    async fn query<T: DeserializeOwned>(
        &self,
        method: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let request = self
            .client
            .http
            .get(self.client.endpoint(method))
            .query(params)
            .bearer_auth(&self.auth.access_jwt);
        send(method, request).await
    }
}

#[async_trait]
impl Upstream for Session {
    async fn get_profile(&self, actor: &str) -> Result<ProfileView, UpstreamError> {
        self.query(GET_PROFILE, &[("actor", actor)]).await
    }

    async fn get_post_thread(&self, uri: &str, depth: u32) -> Result<PostView, UpstreamError> {
        let depth = depth.to_string();
        let output: PostThreadOutput = self
            .query(GET_POST_THREAD, &[("uri", uri), ("depth", &depth)])
            .await?;
        thread_root(uri, output.thread)
    }
}

/// Send a request and decode the JSON response body.
async fn send<T: DeserializeOwned>(
    method: &'static str,
    request: RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(method, response).await);
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode { method, source })
}

async fn status_error(method: &'static str, response: Response) -> UpstreamError {
    let status = response.status().as_u16();
    let body = response.bytes().await.unwrap_or_default();
    let parsed: XrpcErrorBody = serde_json::from_slice(&body).unwrap_or_default();

    UpstreamError::Status {
        method,
        status,
        error: parsed.error.unwrap_or_else(|| "UnknownError".to_string()),
        message: parsed.message.unwrap_or_default(),
    }
}

/// Extract the root post from a `getPostThread` thread union.
fn thread_root(uri: &str, thread: Value) -> Result<PostView, UpstreamError> {
    let kind = thread
        .get("$type")
        .and_then(Value::as_str)
        .unwrap_or("<missing>")
        .to_string();
    if kind != THREAD_VIEW_POST {
        return Err(UpstreamError::UnexpectedThread {
            uri: uri.to_string(),
            kind,
        });
    }

    let post = thread.get("post").cloned().unwrap_or(Value::Null);
    serde_json::from_value(post).map_err(|source| UpstreamError::Decode {
        method: GET_POST_THREAD,
        source,
    })
}
