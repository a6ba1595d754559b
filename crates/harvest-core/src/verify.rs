//! # Verification Links
//!
//! Pure URL builders for the batch verification scheme.
//!
//! ## URL Scheme
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Verification URL Scheme                             │
//! │                                                                         │
//! │  BatchIdentifier "BATCH-1760400000123-9F3A"                            │
//! │       │                                                                 │
//! │       ▼  build_verification_url                                         │
//! │  https://blockchain-verify.com/batch/BATCH-1760400000123-9F3A          │
//! │       │                                                                 │
//! │       ▼  build_scan_image_url                                           │
//! │  https://api.qrserver.com/v1/create-qr-code/?size=200x200              │
//! │        &data=https%3A%2F%2Fblockchain-verify.com%2Fbatch%2F...          │
//! │                                                                         │
//! │  extract_batch_identifier reverses the first step exactly.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here performs network I/O. Fetching the scan image is the
//! presentation layer's job.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use url::{form_urlencoded, Url};

use crate::error::{CoreError, CoreResult};
use crate::types::BatchIdentifier;

/// Host that resolves verification links.
pub const DEFAULT_VERIFY_HOST: &str = "https://blockchain-verify.com";

/// Scannable-code rendering service.
pub const DEFAULT_SCAN_SERVICE: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Edge length of the rendered scan image, in pixels.
pub const DEFAULT_SCAN_SIZE: u32 = 200;

/// Everything `encodeURIComponent` escapes.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const BATCH_PATH: &str = "/batch/";

/// The two URLs shown on the confirmation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VerificationLinks {
    pub verification_url: String,
    pub scan_image_url: String,
}

/// Builds verification and scan-image URLs for batch identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyLinkBuilder {
    /// Base host without trailing slash.
    base_host: String,
    scan_service: String,
    scan_size: u32,
}

impl VerifyLinkBuilder {
    /// Creates a builder; both URLs must be absolute http(s) URLs.
    pub fn new(base_host: &str, scan_service: &str, scan_size: u32) -> CoreResult<Self> {
        let base = parse_http_url(base_host)?;
        if base.query().is_some() || base.fragment().is_some() {
            return Err(CoreError::InvalidVerificationUrl {
                url: base_host.to_string(),
                reason: "base host must not carry a query or fragment".to_string(),
            });
        }
        parse_http_url(scan_service)?;

        Ok(VerifyLinkBuilder {
            base_host: base_host.trim().trim_end_matches('/').to_string(),
            scan_service: scan_service.trim().to_string(),
            scan_size,
        })
    }

    pub fn base_host(&self) -> &str {
        &self.base_host
    }

    /// `{base_host}/batch/{batch_id}` with the identifier percent-encoded.
    pub fn build_verification_url(&self, batch_id: &BatchIdentifier) -> String {
        format!(
            "{}{}{}",
            self.base_host,
            BATCH_PATH,
            utf8_percent_encode(batch_id.as_str(), COMPONENT)
        )
    }

    /// Request URL for the scannable-code image of `verification_url`.
    pub fn build_scan_image_url(&self, verification_url: &str) -> String {
        let separator = if self.scan_service.contains('?') { '&' } else { '?' };
        let data: String = form_urlencoded::byte_serialize(verification_url.as_bytes()).collect();
        format!(
            "{}{}size={2}x{2}&data={3}",
            self.scan_service, separator, self.scan_size, data
        )
    }

    /// Recovers the identifier from a URL built by [`Self::build_verification_url`].
    pub fn extract_batch_identifier(&self, verification_url: &str) -> CoreResult<BatchIdentifier> {
        let invalid = |reason: &str| CoreError::InvalidVerificationUrl {
            url: verification_url.to_string(),
            reason: reason.to_string(),
        };

        let encoded = verification_url
            .strip_prefix(self.base_host.as_str())
            .and_then(|rest| rest.strip_prefix(BATCH_PATH))
            .ok_or_else(|| invalid("not a batch verification URL"))?;

        if encoded.contains(['/', '?', '#']) {
            return Err(invalid("unexpected path, query, or fragment after identifier"));
        }

        let decoded = percent_decode_str(encoded)
            .decode_utf8()
            .map_err(|_| invalid("identifier is not valid UTF-8"))?;

        BatchIdentifier::new(decoded.into_owned()).map_err(CoreError::from)
    }

    /// Both confirmation-screen URLs for one batch.
    pub fn links(&self, batch_id: &BatchIdentifier) -> VerificationLinks {
        let verification_url = self.build_verification_url(batch_id);
        let scan_image_url = self.build_scan_image_url(&verification_url);
        VerificationLinks {
            verification_url,
            scan_image_url,
        }
    }
}

impl Default for VerifyLinkBuilder {
    fn default() -> Self {
        VerifyLinkBuilder {
            base_host: DEFAULT_VERIFY_HOST.to_string(),
            scan_service: DEFAULT_SCAN_SERVICE.to_string(),
            scan_size: DEFAULT_SCAN_SIZE,
        }
    }
}

fn parse_http_url(raw: &str) -> CoreResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| CoreError::InvalidVerificationUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CoreError::InvalidVerificationUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
