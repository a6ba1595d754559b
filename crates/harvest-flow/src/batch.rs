//! # Batch Identifier Generation
//!
//! Issues the opaque token handed back after a ledger acknowledgment.
//!
//! ```text
//!   BATCH-1760434200000-7f3a
//!   ─┬─── ─────┬─────── ─┬──
//!    │         │         └── 4 hex chars from a UUID v4
//!    │         └──────────── ack time in ms, strictly increasing per generator
//!    └────────────────────── configured prefix
//! ```
//!
//! Two acknowledgments in the same millisecond still get different ids: the
//! millisecond part is bumped past the previous one.

use chrono::{DateTime, Utc};
use harvest_core::BatchIdentifier;
use tracing::debug;
use uuid::Uuid;

pub struct BatchIdGenerator {
    prefix: String,
    last_millis: Option<i64>,
}

impl BatchIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        BatchIdGenerator {
            prefix: prefix.into(),
            last_millis: None,
        }
    }

    /// Issues the identifier for an acknowledgment at `acknowledged_at`.
    pub fn next(&mut self, acknowledged_at: DateTime<Utc>) -> BatchIdentifier {
        let mut millis = acknowledged_at.timestamp_millis();
        if let Some(last) = self.last_millis {
            if millis <= last {
                millis = last + 1;
            }
        }
        self.last_millis = Some(millis);

        let suffix = Uuid::new_v4().simple().to_string();
        let id = BatchIdentifier::compose(&self.prefix, millis, &suffix[..4]);
        debug!(batch_id = %id, "Issued batch identifier");
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ack_time;
    use chrono::Duration;

    #[test]
    fn test_identifier_shape() {
        let mut ids = BatchIdGenerator::new("BATCH");
        let id = ids.next(ack_time());
        let parts: Vec<&str> = id.as_str().split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "BATCH");
        assert_eq!(parts[1], ack_time().timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 4);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_same_instant_yields_distinct_ids() {
        let mut ids = BatchIdGenerator::new("BATCH");
        let a = ids.next(ack_time());
        let b = ids.next(ack_time());
        assert_ne!(a, b);
    }

    #[test]
    fn test_millis_strictly_increase_even_if_clock_goes_back() {
        let mut ids = BatchIdGenerator::new("B");
        let first = ids.next(ack_time());
        let earlier = ids.next(ack_time() - Duration::seconds(5));

        let millis = |id: &BatchIdentifier| -> i64 {
            id.as_str().split('-').nth(1).unwrap().parse().unwrap()
        };
        assert_eq!(millis(&earlier), millis(&first) + 1);
    }
}
