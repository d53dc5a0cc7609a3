//! Application state shared across all request handlers.
//!
//! Built once before the listener starts and never mutated afterwards;
//! handlers only read from it.

use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::templates::Templates;
use crate::upstream::{Upstream, XrpcClient};
use crate::waitlist::{MailingList, Mailmodo};

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Authenticated upstream session.
    pub upstream: Arc<dyn Upstream>,

    /// Page templates.
    pub templates: Arc<Templates>,

    /// Waitlist mailing list.
    pub waitlist: Arc<dyn MailingList>,
}

impl AppState {
    /// Assemble state from already-constructed collaborators.
    pub fn new(
        config: Config,
        upstream: Arc<dyn Upstream>,
        templates: Templates,
        waitlist: Arc<dyn MailingList>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
            templates: Arc::new(templates),
            waitlist,
        }
    }

    /// Establish the upstream session and load templates.
    ///
    /// A failed credential exchange is fatal: the server has nothing useful
    /// to serve without an upstream identity.
    pub async fn bootstrap(config: Config) -> anyhow::Result<Self> {
        let session = XrpcClient::new(&config.appview_host)?
            .create_session(&config.auth_handle, &config.auth_password)
            .await
            .with_context(|| {
                format!(
                    "creating upstream session for {} at {}",
                    config.auth_handle, config.appview_host
                )
            })?;

        tracing::info!(
            host = %session.host(),
            did = %session.auth().did,
            handle = %session.auth().handle,
            "upstream session established"
        );

        let templates = if config.debug {
            tracing::info!(dir = %config.template_dir.display(), "loading templates from disk");
            Templates::from_dir(&config.template_dir)
        } else {
            Templates::embedded().context("parsing embedded templates")?
        };

        let waitlist = Mailmodo::new(config.mailmodo_api_key.clone())?;

        Ok(Self::new(
            config,
            Arc::new(session),
            templates,
            Arc::new(waitlist),
        ))
    }
}
