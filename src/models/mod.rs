//! Wire types for the remote shortening service.
//!
//! The service owns every record; this crate only holds transient, read-only
//! copies deserialized per request. Nothing here is cached or written back.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// One shortened link as the service reports it. Every field is verbatim
/// from the response body; display strings are assembled elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortLinkRecord {
    /// Server-assigned short code (wire name `short_url`)
    #[serde(rename = "short_url")]
    pub short_code: String,
    pub original_url: String,
    /// The service may omit this for links that were never followed
    #[serde(default)]
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateLinkRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkResponse {
    pub short_url: String,
}

/// Result of a successful shorten call: the raw code is kept alongside the
/// display URL so it can be reused later (e.g. for a redirect test).
#[derive(Debug, Clone)]
pub struct ShortenedLink {
    pub short_code: String,
    pub display_url: String,
}

/// A looked-up record plus its locally-assembled display URL.
#[derive(Debug, Clone)]
pub struct LinkDetails {
    pub record: ShortLinkRecord,
    pub display_url: String,
}

/// What a non-following GET against the public endpoint observed.
#[derive(Debug, Clone)]
pub struct RedirectProbe {
    pub status: StatusCode,
    /// Value of the `Location` header, when the service sent one
    pub location: Option<String>,
}
