use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// One async mutex per doctor. Holding the guard serializes the
/// read-validate-write sequence for that doctor's calendar.
#[derive(Default)]
pub struct DoctorLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl DoctorLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, doctor_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(doctor_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Locks every listed doctor, in ascending id order so that two callers
    /// locking overlapping sets cannot deadlock. Duplicates are locked once.
    pub async fn acquire_all(&self, doctor_ids: &[Uuid]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids = doctor_ids.to_vec();
        ids.sort();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.acquire(id).await);
        }
        guards
    }
}
