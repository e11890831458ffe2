//! # Acknowledgement Log
//!
//! A bounded, insertion-ordered set of message ids whose opening has already
//! been reported to the backend. The log is the idempotence guarantee behind
//! `mark_message_opened`: an id found here never triggers a second remote
//! call.
//!
//! ## Bound & Eviction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  AcknowledgementLog (capacity 100)                      │
//! │                                                                         │
//! │  record(id-101) at capacity:                                            │
//! │                                                                         │
//! │   front (oldest)                                  back (newest)         │
//! │   ┌──────┬──────┬──────┬─────────────────┬────────┐                    │
//! │   │ id-1 │ id-2 │ id-3 │       ...       │ id-100 │                    │
//! │   └──┬───┴──────┴──────┴─────────────────┴────────┘                    │
//! │      │ evicted (FIFO)                        ▲                          │
//! │      ▼                                       │ appended                 │
//! │    gone                                   id-101                        │
//! │                                                                         │
//! │  record(id-50) while present: no-op, order unchanged                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Eviction only reclaims local memory. A message whose id has aged out can
//! be acknowledged remotely a second time; per message the state machine is
//! `Unseen → Acknowledged` with no way back.

use std::collections::VecDeque;

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::{LIST_DELIMITER, MAX_ACKNOWLEDGED_MESSAGES};

// =============================================================================
// AcknowledgementLog
// =============================================================================

/// Bounded FIFO log of acknowledged message ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcknowledgementLog {
    // Insertion order, oldest at the front. Never exceeds
    // MAX_ACKNOWLEDGED_MESSAGES entries.
    ids: VecDeque<Uuid>,
}

impl AcknowledgementLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        AcknowledgementLog::default()
    }

    /// Returns true if `id` has already been acknowledged.
    pub fn contains(&self, id: Uuid) -> bool {
        self.ids.contains(&id)
    }

    /// Records `id` as acknowledged.
    ///
    /// Returns `false` (no-op) when the id is already present. When the log
    /// is at capacity the oldest entry is evicted before the append, so the
    /// size never exceeds [`MAX_ACKNOWLEDGED_MESSAGES`].
    pub fn record(&mut self, id: Uuid) -> bool {
        if self.contains(id) {
            return false;
        }
        if self.ids.len() >= MAX_ACKNOWLEDGED_MESSAGES {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
        true
    }

    /// Number of ids currently held.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing has been acknowledged yet.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates ids oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.ids.iter().copied()
    }

    /// Encodes the log into its persisted delimited form, oldest-first.
    pub fn encode(&self) -> String {
        self.ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(&LIST_DELIMITER.to_string())
    }

    /// Decodes the persisted delimited form.
    ///
    /// Empty entries are dropped; an entry that is not a UUID fails with
    /// [`CoreError::InvalidMessageId`]. Entries beyond the capacity are
    /// trimmed oldest-first, so a log widened by a future version still
    /// loads within bounds.
    pub fn decode(encoded: &str) -> CoreResult<Self> {
        let mut ids = VecDeque::new();
        for part in encoded.split(LIST_DELIMITER) {
            if part.is_empty() {
                continue;
            }
            let id = Uuid::parse_str(part)
                .map_err(|_| CoreError::InvalidMessageId(part.to_string()))?;
            if !ids.contains(&id) {
                ids.push_back(id);
            }
        }
        while ids.len() > MAX_ACKNOWLEDGED_MESSAGES {
            ids.pop_front();
        }
        Ok(AcknowledgementLog { ids })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
