//! Page rendering: the capability the crawler navigates with.

use std::time::Duration;

use reqwest::Client;

use crate::document::Document;
use crate::error::ScraperError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ja,en-US;q=0.7,en;q=0.3";

/// A navigation session over some rendering engine.
///
/// The crawler acquires one session per run, calls [`RenderSession::navigate`]
/// for every listing and detail page in order, and calls
/// [`RenderSession::close`] exactly once on every exit path.
#[allow(async_fn_in_trait)]
pub trait RenderSession {
    /// Loads `url` and returns the document once its content is available.
    ///
    /// # Errors
    ///
    /// Returns a [`ScraperError`] if the page cannot be loaded in time.
    async fn navigate(&mut self, url: &str) -> Result<Document, ScraperError>;

    /// Releases the session's resources. Further navigation must fail.
    async fn close(&mut self);
}

/// Renders pages by fetching their HTML over HTTP and parsing it.
///
/// No JavaScript runs, so only server-rendered markup is visible. The
/// configured timeout bounds the whole load (connect, headers, and body).
pub struct HttpRenderer {
    client: Option<Client>,
    timeout_secs: u64,
}

impl HttpRenderer {
    /// Creates a renderer with the given per-navigation timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self {
            client: Some(client),
            timeout_secs,
        })
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> ScraperError {
        if err.is_timeout() {
            ScraperError::NavigationTimeout {
                url: url.to_owned(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            ScraperError::Http(err)
        }
    }
}

impl RenderSession for HttpRenderer {
    async fn navigate(&mut self, url: &str) -> Result<Document, ScraperError> {
        let client = self.client.as_ref().ok_or(ScraperError::SessionClosed)?;

        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, ACCEPT_HTML)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        // Keep the post-redirect location; detail URLs are recorded from it.
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        tracing::debug!(url = %final_url, bytes = body.len(), "page loaded");

        Ok(Document::parse(&final_url, &body))
    }

    async fn close(&mut self) {
        if self.client.take().is_some() {
            tracing::debug!("render session closed");
        }
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
