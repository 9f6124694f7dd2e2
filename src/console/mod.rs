//! The interaction controller.
//!
//! Each user action drives exactly one network round trip and resolves to a
//! render on the presentation sink (or a discarded stale result). The health
//! monitor runs on its own timer, decoupled from user actions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::Local;
use tracing::debug;

use crate::client::ShortenerClient;
use crate::clipboard::ClipboardHelper;
use crate::config::Config;
use crate::error::{ConsoleError, ConsoleResult};
use crate::health::{HealthMonitor, HealthSnapshot};
use crate::models::{LinkDetails, RedirectProbe, ShortenedLink};
use crate::sink::{PresentationSink, Region, Severity};

/// Monotonic token per interactive region. A new submission invalidates any
/// in-flight request for the same region, so a slow earlier response can
/// never overwrite a faster later one.
#[derive(Debug, Default)]
struct Generation(AtomicU64);

impl Generation {
    fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::SeqCst) == token
    }
}

pub struct Console {
    client: ShortenerClient,
    clipboard: ClipboardHelper,
    sink: Arc<dyn PresentationSink>,
    monitor: HealthMonitor,
    shorten_gen: Generation,
    lookup_gen: Generation,
    redirect_gen: Generation,
}

impl Console {
    pub fn new(config: &Config, sink: Arc<dyn PresentationSink>) -> Result<Self> {
        let client = ShortenerClient::from_config(config)?;
        let monitor = HealthMonitor::from_config(config, Arc::clone(&sink))?;

        Ok(Self {
            client,
            clipboard: ClipboardHelper::new(),
            sink,
            monitor,
            shorten_gen: Generation::default(),
            lookup_gen: Generation::default(),
            redirect_gen: Generation::default(),
        })
    }

    /// Begin periodic health polling. Call once after construction.
    pub fn start(&self) {
        self.monitor.start();
    }

    /// Stop the health timer. Dropping the console has the same effect.
    pub fn shutdown(&self) {
        self.monitor.stop();
    }

    pub async fn health(&self) -> HealthSnapshot {
        self.monitor.snapshot().await
    }

    /// Shorten `input`. On success renders the new link into the shorten
    /// region and clears its input field; the result is also returned so the
    /// embedder can reuse the short code (e.g. for a redirect test).
    pub async fn submit_shorten(&self, input: &str) -> ConsoleResult<ShortenedLink> {
        if input.trim().is_empty() {
            self.sink
                .render(Region::Shorten, "Please enter a URL", Severity::Error);
            return Err(ConsoleError::EmptyInput);
        }

        let token = self.shorten_gen.begin();
        self.sink
            .render(Region::Shorten, "Creating a short link...", Severity::Info);

        let result = self.client.shorten(input).await;
        if !self.shorten_gen.is_current(token) {
            debug!("discarding stale shorten result");
            return result;
        }

        match &result {
            Ok(link) => {
                self.sink.render(
                    Region::Shorten,
                    &format_shorten_success(link, input.trim()),
                    Severity::Success,
                );
                self.sink.clear_input(Region::Shorten);
            }
            Err(err) => {
                self.sink
                    .render(Region::Shorten, &format!("Error: {err}"), Severity::Error);
            }
        }
        result
    }

    /// Look up a short code. The lookup input is cleared only on success;
    /// a not-found code stays in the field for correction.
    pub async fn submit_lookup(&self, input: &str) -> ConsoleResult<LinkDetails> {
        if input.trim().is_empty() {
            self.sink
                .render(Region::Lookup, "Please enter a short code", Severity::Error);
            return Err(ConsoleError::EmptyInput);
        }

        let token = self.lookup_gen.begin();
        self.sink
            .render(Region::Lookup, "Looking up the link...", Severity::Info);

        let result = self.client.lookup(input).await;
        if !self.lookup_gen.is_current(token) {
            debug!("discarding stale lookup result");
            return result;
        }

        match &result {
            Ok(details) => {
                self.sink.render(
                    Region::Lookup,
                    &format_lookup_success(details),
                    Severity::Success,
                );
                self.sink.clear_input(Region::Lookup);
            }
            Err(err) => {
                self.sink
                    .render(Region::Lookup, &format!("Error: {err}"), Severity::Error);
            }
        }
        result
    }

    /// Probe the public endpoint for a short code without following the
    /// redirect, and report the observed status and `Location`.
    pub async fn submit_redirect(&self, input: &str) -> ConsoleResult<RedirectProbe> {
        if input.trim().is_empty() {
            self.sink
                .render(Region::Redirect, "Please enter a short code", Severity::Error);
            return Err(ConsoleError::EmptyInput);
        }

        let token = self.redirect_gen.begin();
        self.sink
            .render(Region::Redirect, "Testing the redirect...", Severity::Info);

        let result = self.client.verify_redirect(input).await;
        if !self.redirect_gen.is_current(token) {
            debug!("discarding stale redirect result");
            return result;
        }

        match &result {
            Ok(probe) => {
                self.sink.render(
                    Region::Redirect,
                    &format_redirect_success(probe, &self.client.display_url(input.trim())),
                    Severity::Success,
                );
            }
            Err(err) => {
                self.sink
                    .render(Region::Redirect, &format!("Error: {err}"), Severity::Error);
            }
        }
        result
    }

    /// Copy `text` to the clipboard, best effort. The confirmation is shown
    /// unconditionally; the primary and fallback paths are indistinguishable
    /// here.
    pub fn copy_link(&self, text: &str) {
        if let Err(err) = self.clipboard.copy(text) {
            debug!("clipboard copy failed: {err}");
        }
        self.sink
            .render(Region::Notice, "Copied to clipboard", Severity::Success);
    }
}

fn format_shorten_success(link: &ShortenedLink, original: &str) -> String {
    format!(
        "Short link created: {}\nOriginal URL: {}",
        link.display_url, original
    )
}

fn format_lookup_success(details: &LinkDetails) -> String {
    let created = details
        .record
        .created_at
        .with_timezone(&Local)
        .format("%c");
    format!(
        "Short link: {}\nOriginal URL: {}\nClicks: {}\nCreated: {}",
        details.display_url, details.record.original_url, details.record.clicks, created
    )
}

fn format_redirect_success(probe: &RedirectProbe, short_url: &str) -> String {
    let target = probe.location.as_deref().unwrap_or("(no Location header)");
    format!(
        "Redirect works. {} -> {} (status {})",
        short_url, target, probe.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShortLinkRecord;
    use chrono::{TimeZone, Utc};
    use reqwest::StatusCode;

    #[test]
    fn generation_invalidates_older_tokens() {
        let generation = Generation::default();
        let first = generation.begin();
        assert!(generation.is_current(first));
        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn shorten_message_contains_display_url_and_original() {
        let link = ShortenedLink {
            short_code: "ab12Cd".to_string(),
            display_url: "http://localhost:8080/ab12Cd".to_string(),
        };
        let message = format_shorten_success(&link, "https://example.com/very/long/path");
        assert!(message.contains("http://localhost:8080/ab12Cd"));
        assert!(message.contains("https://example.com/very/long/path"));
    }

    #[test]
    fn lookup_message_reports_clicks_and_creation_time() {
        let details = LinkDetails {
            record: ShortLinkRecord {
                short_code: "ab12Cd".to_string(),
                original_url: "https://example.com".to_string(),
                clicks: 7,
                created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 30, 0).unwrap(),
            },
            display_url: "http://localhost:8080/ab12Cd".to_string(),
        };
        let message = format_lookup_success(&details);
        assert!(message.contains("Clicks: 7"));
        assert!(message.contains("Created: "));
    }

    #[test]
    fn redirect_message_handles_missing_location() {
        let probe = RedirectProbe {
            status: StatusCode::TEMPORARY_REDIRECT,
            location: None,
        };
        let message = format_redirect_success(&probe, "http://localhost:8080/ab12Cd");
        assert!(message.contains("(no Location header)"));
        assert!(message.contains("307"));
    }
}
