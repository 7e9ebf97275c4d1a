//! Remote content and front-end notifications.

use std::time::Duration;

use async_trait::async_trait;
use pioneer_core::{
    application::{
        ApplicationError,
        ports::{ContentFetcher, Notification, Notifier},
    },
    error::PioneerResult,
};
use reqwest::Client;
use tracing::{info, instrument};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`ContentFetcher`] over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> PioneerResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> PioneerResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pioneer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApplicationError::ContentFetch {
                url: String::new(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn request_content(&self, url: &str) -> PioneerResult<String> {
        let fetch_error = |e: reqwest::Error| ApplicationError::ContentFetch {
            url: url.to_string(),
            reason: e.to_string(),
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_error)?;
        Ok(response.text().await.map_err(fetch_error)?)
    }
}

/// [`Notifier`] that writes progress messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        let message = notification.message.trim_end();
        match &notification.method {
            Some(method) => info!(method = %method, "{message}"),
            None => info!("{message}"),
        }
    }
}
