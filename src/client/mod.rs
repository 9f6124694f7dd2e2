//! HTTP client for the remote shortening service.
//!
//! Two underlying `reqwest` clients: the API client follows defaults, while
//! the probe client has redirect-following disabled so a 3xx response is
//! returned to the caller instead of being chased to its `Location`.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header::LOCATION, redirect, Client, StatusCode};
use tracing::debug;

use crate::config::Config;
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::{
    CreateLinkRequest, CreateLinkResponse, LinkDetails, RedirectProbe, ShortLinkRecord,
    ShortenedLink,
};

#[derive(Clone)]
pub struct ShortenerClient {
    api: Client,
    probe: Client,
    api_base: String,
    public_base: String,
}

impl ShortenerClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let api = Client::builder()
            .user_agent(concat!("linkdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client for the shortening API")?;

        let probe = Client::builder()
            .user_agent(concat!("linkdeck/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .context("failed to build non-following HTTP client for redirect probes")?;

        Ok(Self {
            api,
            probe,
            api_base: config.api_base_url.clone(),
            public_base: config.public_base_url.clone(),
        })
    }

    /// The address a user would actually follow: public base + short code.
    pub fn display_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.public_base, short_code)
    }

    /// Submit a URL for shortening. Exactly one POST; the input is sent
    /// verbatim (after trimming) and malformed URLs are the service's call.
    pub async fn shorten(&self, url: &str) -> ConsoleResult<ShortenedLink> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ConsoleError::EmptyInput);
        }

        let response = self
            .api
            .post(format!("{}/shorten", self.api_base))
            .json(&CreateLinkRequest {
                url: url.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConsoleError::RequestFailed(status));
        }

        let body: CreateLinkResponse = response.json().await?;
        debug!(short_code = %body.short_url, "short link created");

        Ok(ShortenedLink {
            display_url: self.display_url(&body.short_url),
            short_code: body.short_url,
        })
    }

    /// Resolve a short code to its record. 404 maps to `NotFound`; any other
    /// non-2xx keeps its status.
    pub async fn lookup(&self, short_code: &str) -> ConsoleResult<LinkDetails> {
        let short_code = short_code.trim();
        if short_code.is_empty() {
            return Err(ConsoleError::EmptyInput);
        }

        let response = self
            .api
            .get(format!("{}/url/{}", self.api_base, short_code))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ConsoleError::NotFound);
        }
        if !status.is_success() {
            return Err(ConsoleError::RequestFailed(status));
        }

        let record: ShortLinkRecord = response.json().await?;
        Ok(LinkDetails {
            display_url: self.display_url(&record.short_code),
            record,
        })
    }

    /// Hit the public endpoint with redirect-following disabled and inspect
    /// the response. Success means a 3xx; anything else (a 2xx included) is
    /// an `UnexpectedStatus`. Read-only: click accounting is the service's
    /// concern.
    pub async fn verify_redirect(&self, short_code: &str) -> ConsoleResult<RedirectProbe> {
        let short_code = short_code.trim();
        if short_code.is_empty() {
            return Err(ConsoleError::EmptyInput);
        }

        let response = self
            .probe
            .get(format!("{}/{}", self.public_base, short_code))
            .send()
            .await?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(ConsoleError::UnexpectedStatus(status));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(RedirectProbe { status, location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShortenerClient {
        let config = Config::for_service("http://localhost:8080/api/v1", "http://localhost:8080/");
        ShortenerClient::from_config(&config).unwrap()
    }

    #[test]
    fn display_url_joins_public_base_and_code() {
        assert_eq!(client().display_url("ab12Cd"), "http://localhost:8080/ab12Cd");
    }

    #[tokio::test]
    async fn empty_inputs_fail_before_any_network_call() {
        // No server is listening; a network attempt would be a Transport error.
        let client = client();
        assert!(matches!(client.shorten("").await, Err(ConsoleError::EmptyInput)));
        assert!(matches!(client.shorten("   ").await, Err(ConsoleError::EmptyInput)));
        assert!(matches!(client.lookup(" ").await, Err(ConsoleError::EmptyInput)));
        assert!(matches!(
            client.verify_redirect("\t").await,
            Err(ConsoleError::EmptyInput)
        ));
    }
}
