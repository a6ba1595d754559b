//! # Simulated Ledger
//!
//! In-process stand-in for the durable ledger: waits a fixed latency, appends
//! the record's JSON payload to an in-memory log, and acknowledges.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use harvest_core::HarvestRecord;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::capability::{LedgerAck, LedgerClient, LedgerError};
use crate::config::HarvestConfig;

/// One accepted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub payload: String,
    pub acknowledged_at: DateTime<Utc>,
}

pub struct SimulatedLedger {
    latency: Duration,
    entries: Mutex<Vec<LedgerEntry>>,
}

impl SimulatedLedger {
    pub fn new(latency: Duration) -> Self {
        SimulatedLedger {
            latency,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &HarvestConfig) -> Self {
        Self::new(config.ledger_latency())
    }

    /// Snapshot of everything accepted so far, oldest first.
    pub async fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl LedgerClient for SimulatedLedger {
    async fn submit_record(&self, record: &HarvestRecord) -> Result<LedgerAck, LedgerError> {
        let payload = record
            .to_payload()
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;

        debug!(latency_ms = self.latency.as_millis() as u64, "Simulating ledger round trip");
        tokio::time::sleep(self.latency).await;

        let acknowledged_at = Utc::now();
        let mut entries = self.entries.lock().await;
        entries.push(LedgerEntry {
            payload,
            acknowledged_at,
        });
        info!(entries = entries.len(), "Ledger accepted record");

        Ok(LedgerAck { acknowledged_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::{HarvestDraft, HarvestField, LocationFix};

    fn record() -> HarvestRecord {
        let mut draft = HarvestDraft::new(Utc::now());
        draft.set_field(HarvestField::CropType, "Brahmi");
        draft.set_field(HarvestField::QuantityKg, "1.25");
        draft.set_field(HarvestField::OperatorId, "F-9");
        draft.set_location(LocationFix::new(10.0, 20.0, Utc::now()).unwrap());
        draft.freeze().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_ledger_waits_then_logs() {
        let ledger = SimulatedLedger::new(Duration::from_secs(2));
        let started = tokio::time::Instant::now();

        ledger.submit_record(&record()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));

        let entries = ledger.entries().await;
        assert_eq!(entries.len(), 1);
        let json: serde_json::Value = serde_json::from_str(&entries[0].payload).unwrap();
        assert_eq!(json["cropType"], "Brahmi");
        assert_eq!(json["operatorId"], "F-9");
    }

    #[test]
    fn test_latency_from_config() {
        let mut config = HarvestConfig::default();
        config.ledger.simulated_latency_ms = 250;
        let ledger = SimulatedLedger::from_config(&config);
        assert_eq!(ledger.latency, Duration::from_millis(250));
    }
}
