//! Store handle that serializes every operation through one lock.
//!
//! # Invariants
//! - At most one unit of work runs against the backend at a time.
//! - A poisoned lock is recovered; units always re-read from storage.

use super::unit_of_work::UnitOfWork;
use crate::clock::{Clock, SystemClock};
use crate::kv::KvStore;
use crate::model::EpochMs;
use log::warn;
use std::sync::{Arc, Mutex, PoisonError};

/// Runs closures as single units of work against persisted state.
///
/// Every repository trait is implemented on top of this, so callers can
/// also group several operations into one atomic unit.
pub trait StoreAccess {
    fn unit_of_work<T>(&self, work: impl FnOnce(&mut UnitOfWork<'_>) -> T) -> T;
}

/// Social data store over a key-value backend.
pub struct SocialStore<K: KvStore> {
    kv: Mutex<K>,
    clock: Arc<dyn Clock>,
}

impl<K: KvStore> SocialStore<K> {
    /// Creates a store using the wall clock.
    pub fn new(kv: K) -> Self {
        Self::with_clock(kv, Arc::new(SystemClock))
    }

    pub fn with_clock(kv: K, clock: Arc<dyn Clock>) -> Self {
        Self {
            kv: Mutex::new(kv),
            clock,
        }
    }

    pub fn now_ms(&self) -> EpochMs {
        self.clock.now_ms()
    }

    /// Gives raw backend access under the store lock.
    pub fn with_backend<T>(&self, f: impl FnOnce(&mut K) -> T) -> T {
        let mut guard = self.kv.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn into_backend(self) -> K {
        self.kv.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: KvStore> StoreAccess for SocialStore<K> {
    fn unit_of_work<T>(&self, work: impl FnOnce(&mut UnitOfWork<'_>) -> T) -> T {
        let mut guard = self.kv.lock().unwrap_or_else(PoisonError::into_inner);
        let kv: &mut K = &mut guard;

        if let Err(err) = kv.begin_unit() {
            warn!("event=unit_begin module=store status=error error={err}");
        }

        let now = self.clock.now_ms();
        let result = {
            let mut unit = UnitOfWork::new(&mut *kv, now);
            let result = work(&mut unit);
            unit.commit();
            result
        };

        if let Err(err) = kv.finish_unit() {
            warn!("event=unit_finish module=store status=error error={err}");
        }
        result
    }
}

impl<S: StoreAccess + ?Sized> StoreAccess for Arc<S> {
    fn unit_of_work<T>(&self, work: impl FnOnce(&mut UnitOfWork<'_>) -> T) -> T {
        (**self).unit_of_work(work)
    }
}
