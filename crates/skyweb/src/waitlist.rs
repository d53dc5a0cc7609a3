//! Mailing-list client for waitlist signups.

use async_trait::async_trait;
use serde::Serialize;

/// Mailmodo endpoint for adding a contact to a list.
pub const MAILMODO_ADD_TO_LIST: &str = "https://api.mailmodo.com/api/v1/addToList";

/// Waitlist signup errors.
#[derive(Debug, thiserror::Error)]
pub enum WaitlistError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mailing list rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A third-party mailing list that accepts signups.
#[async_trait]
pub trait MailingList: Send + Sync {
    /// Add `email` to the list named `list`.
    async fn add_to_list(&self, list: &str, email: &str) -> Result<(), WaitlistError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddToListRequest<'a> {
    email: &'a str,
    list_name: &'a str,
}

/// Mailmodo API client.
#[derive(Clone)]
pub struct Mailmodo {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl Mailmodo {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WaitlistError> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            api_key: api_key.into(),
            endpoint: MAILMODO_ADD_TO_LIST.to_string(),
        })
    }
}

impl std::fmt::Debug for Mailmodo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mailmodo")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MailingList for Mailmodo {
    async fn add_to_list(&self, list: &str, email: &str) -> Result<(), WaitlistError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("mmApiKey", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&AddToListRequest {
                email,
                list_name: list,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WaitlistError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(list, "added waitlist signup");
        Ok(())
    }
}
