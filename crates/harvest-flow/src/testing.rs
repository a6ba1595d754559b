//! Deterministic capability fakes shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use harvest_core::{HarvestRecord, LocationFix, SubmissionResult, VerificationLinks};

use crate::capability::{
    CapabilityError, Clipboard, LedgerAck, LedgerClient, LedgerError, LocationProvider, Position,
    SharePayload, ShareProvider,
};
use crate::events::FlowEventEmitter;
use crate::location::LocationStatus;
use crate::submission::FlowPhase;

pub(crate) fn ack_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 14, 9, 30, 0).single().unwrap()
}

// =============================================================================
// Location
// =============================================================================

/// Replays queued responses; repeats the last one when the queue runs dry.
pub(crate) struct ScriptedLocation {
    responses: Mutex<VecDeque<Result<Position, CapabilityError>>>,
    last: Mutex<Result<Position, CapabilityError>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedLocation {
    pub(crate) fn fixed(latitude: f64, longitude: f64) -> Arc<Self> {
        Self::script(vec![Ok(Position {
            latitude,
            longitude,
        })])
    }

    pub(crate) fn failing(err: CapabilityError) -> Arc<Self> {
        Self::script(vec![Err(err)])
    }

    pub(crate) fn script(responses: Vec<Result<Position, CapabilityError>>) -> Arc<Self> {
        Self::slow(responses, Duration::ZERO)
    }

    pub(crate) fn slow(
        responses: Vec<Result<Position, CapabilityError>>,
        delay: Duration,
    ) -> Arc<Self> {
        let last = responses
            .last()
            .cloned()
            .unwrap_or(Err(CapabilityError::Unavailable));
        Arc::new(ScriptedLocation {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(last),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    async fn current_position(&self) -> Result<Position, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => {
                *self.last.lock().unwrap() = response.clone();
                response
            }
            None => self.last.lock().unwrap().clone(),
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Acks at a fixed time unless a rejection is queued; records what it saw.
pub(crate) struct ScriptedLedger {
    responses: Mutex<VecDeque<Result<LedgerAck, LedgerError>>>,
    received: Mutex<Vec<HarvestRecord>>,
    delay: Duration,
}

impl ScriptedLedger {
    pub(crate) fn accepting() -> Arc<Self> {
        Self::script(Vec::new())
    }

    pub(crate) fn rejecting(err: LedgerError) -> Arc<Self> {
        Self::script(vec![Err(err)])
    }

    pub(crate) fn script(responses: Vec<Result<LedgerAck, LedgerError>>) -> Arc<Self> {
        Self::slow(responses, Duration::ZERO)
    }

    pub(crate) fn slow(responses: Vec<Result<LedgerAck, LedgerError>>, delay: Duration) -> Arc<Self> {
        Arc::new(ScriptedLedger {
            responses: Mutex::new(responses.into()),
            received: Mutex::new(Vec::new()),
            delay,
        })
    }

    pub(crate) fn received(&self) -> Vec<HarvestRecord> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    async fn submit_record(&self, record: &HarvestRecord) -> Result<LedgerAck, LedgerError> {
        self.received.lock().unwrap().push(record.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or(Ok(LedgerAck {
            acknowledged_at: ack_time(),
        }))
    }
}

// =============================================================================
// Share / Clipboard
// =============================================================================

pub(crate) struct RecordingShare {
    result: Result<(), CapabilityError>,
    pub(crate) payloads: Mutex<Vec<SharePayload>>,
}

impl RecordingShare {
    pub(crate) fn new(result: Result<(), CapabilityError>) -> Arc<Self> {
        Arc::new(RecordingShare {
            result,
            payloads: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ShareProvider for RecordingShare {
    async fn share(&self, payload: &SharePayload) -> Result<(), CapabilityError> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.result.clone()
    }
}

pub(crate) struct RecordingClipboard {
    result: Result<(), CapabilityError>,
    pub(crate) copied: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub(crate) fn new(result: Result<(), CapabilityError>) -> Arc<Self> {
        Arc::new(RecordingClipboard {
            result,
            copied: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn copy_text(&self, text: &str) -> Result<(), CapabilityError> {
        self.copied.lock().unwrap().push(text.to_string());
        self.result.clone()
    }
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Phase(FlowPhase),
    Location(LocationStatus),
    Confirmed(String),
    Error { retryable: bool },
}

#[derive(Default)]
pub(crate) struct RecordingEmitter {
    pub(crate) events: Mutex<Vec<Event>>,
}

impl RecordingEmitter {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl FlowEventEmitter for RecordingEmitter {
    fn emit_phase(&self, phase: FlowPhase) {
        self.events.lock().unwrap().push(Event::Phase(phase));
    }

    fn emit_location(&self, status: LocationStatus, _fix: Option<&LocationFix>) {
        self.events.lock().unwrap().push(Event::Location(status));
    }

    fn emit_confirmed(&self, result: &SubmissionResult, _links: &VerificationLinks) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Confirmed(result.batch_id.to_string()));
    }

    fn emit_error(&self, _message: &str, retryable: bool) {
        self.events.lock().unwrap().push(Event::Error { retryable });
    }
}
