//! # In-Memory Store
//!
//! `Mutex`-guarded record with no persistence. Used by the coordinator and
//! tracker tests, and by embedders that already own a persistence layer and
//! only need the contract.

use std::sync::Mutex;

use uuid::Uuid;

use nimbus_core::{AcknowledgementLog, RegistrationState, TagSet};

use crate::error::StoreResult;
use crate::record::RecordV1;
use crate::StateStore;

// =============================================================================
// MemoryStore
// =============================================================================

/// Registration record held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<RecordV1>,
}

impl MemoryStore {
    /// Creates an empty (not registered) store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn with_record<T>(&self, f: impl FnOnce(&mut RecordV1) -> T) -> T {
        // Lock poisoning means a panic mid-mutation; propagating the panic
        // is the only sound option for an in-process test store.
        let mut guard = self.record.lock().expect("memory store lock poisoned");
        f(&mut guard)
    }
}

impl StateStore for MemoryStore {
    fn get(&self) -> StoreResult<Option<RegistrationState>> {
        Ok(self.with_record(|r| r.registration()))
    }

    fn put(&self, state: &RegistrationState) -> StoreResult<()> {
        self.with_record(|r| r.set_registration(state));
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.with_record(|r| *r = RecordV1::default());
        Ok(())
    }

    fn tags(&self) -> StoreResult<TagSet> {
        Ok(self.with_record(|r| r.tags()))
    }

    fn set_tags(&self, tags: &TagSet) -> StoreResult<()> {
        self.with_record(|r| r.set_tags(tags));
        Ok(())
    }

    fn acknowledged(&self) -> StoreResult<AcknowledgementLog> {
        Ok(self.with_record(|r| r.log())?)
    }

    fn record_acknowledged(&self, id: Uuid) -> StoreResult<()> {
        self.with_record(|r| -> StoreResult<()> {
            let mut log = r.log()?;
            log.record(id);
            r.set_log(&log);
            Ok(())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
