//! # Verification Link Sharing
//!
//! Hands a confirmed batch's verification link to the user.
//!
//! ## Share Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   share(batch_id)                                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   share sheet present? ──yes──► share(payload) ──ok──► Shared           │
//! │        │ no                          │ cancelled / failed               │
//! │        ▼                             ▼                                  │
//! │   clipboard present? ────yes──► copy_text(url) ──ok──► Copied           │
//! │        │ no                          │ failed                           │
//! │        ▼                             ▼                                  │
//! │                     FlowError::ShareFailed                              │
//! │                                                                         │
//! │  Sharing is a side effect only; the caller's flow state never changes. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use harvest_core::{BatchIdentifier, VerificationLinks, VerifyLinkBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::capability::{Clipboard, SharePayload, ShareProvider};
use crate::error::{FlowError, FlowResult};

/// Which path delivered the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareOutcome {
    /// Handed to the native share sheet.
    Shared,
    /// Copied to the clipboard instead.
    Copied,
}

/// Builds verification links and shares them through the host's facilities.
#[derive(Clone)]
pub struct VerificationLinkGenerator {
    builder: VerifyLinkBuilder,
    share: Option<Arc<dyn ShareProvider>>,
    clipboard: Option<Arc<dyn Clipboard>>,
}

impl VerificationLinkGenerator {
    pub fn new(
        builder: VerifyLinkBuilder,
        share: Option<Arc<dyn ShareProvider>>,
        clipboard: Option<Arc<dyn Clipboard>>,
    ) -> Self {
        VerificationLinkGenerator {
            builder,
            share,
            clipboard,
        }
    }

    pub fn verification_url(&self, batch_id: &BatchIdentifier) -> String {
        self.builder.build_verification_url(batch_id)
    }

    pub fn links(&self, batch_id: &BatchIdentifier) -> VerificationLinks {
        self.builder.links(batch_id)
    }

    /// What the share sheet is given for `batch_id`.
    pub fn payload(&self, batch_id: &BatchIdentifier) -> SharePayload {
        SharePayload {
            title: format!("Harvest Batch {}", batch_id),
            text: format!("View harvest details for batch {}", batch_id),
            url: self.verification_url(batch_id),
        }
    }

    /// Shares the verification link, falling back to the clipboard.
    pub async fn share(&self, batch_id: &BatchIdentifier) -> FlowResult<ShareOutcome> {
        let payload = self.payload(batch_id);

        match &self.share {
            Some(sheet) => match sheet.share(&payload).await {
                Ok(()) => {
                    info!(batch_id = %batch_id, "Verification link shared");
                    return Ok(ShareOutcome::Shared);
                }
                Err(e) => {
                    debug!(batch_id = %batch_id, reason = %e, "Share sheet did not deliver, trying clipboard");
                }
            },
            None => debug!("No share sheet, trying clipboard"),
        }

        let Some(clipboard) = &self.clipboard else {
            warn!(batch_id = %batch_id, "No share sheet or clipboard available");
            return Err(FlowError::ShareFailed(
                "no share sheet or clipboard available".into(),
            ));
        };

        match clipboard.copy_text(&payload.url).await {
            Ok(()) => {
                info!(batch_id = %batch_id, "Verification link copied to clipboard");
                Ok(ShareOutcome::Copied)
            }
            Err(e) => {
                warn!(batch_id = %batch_id, reason = %e, "Clipboard copy failed");
                Err(FlowError::ShareFailed(e.to_string()))
            }
        }
    }
}
