//! Per-VIN mutual exclusion with bounded waits.

use std::collections::HashSet;
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;

use dealership_core::Vin;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("timed out waiting for vehicle {0}")]
    Timeout(Vin),

    #[error("lock table poisoned")]
    Poisoned,
}

/// Table of VINs currently held by an in-flight transaction.
///
/// Different VINs never contend with each other. Waiters on the same VIN are
/// woken when the holder's guard drops, and give up once their deadline passes.
#[derive(Debug, Default)]
pub struct VinLocks {
    held: Mutex<HashSet<Vin>>,
    released: Condvar,
}

impl VinLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, vin: Vin, timeout: Duration) -> Result<VinGuard<'_>, LockError> {
        let deadline = Instant::now() + timeout;
        let mut held = self.held.lock().map_err(|_| LockError::Poisoned)?;

        while held.contains(&vin) {
            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::Timeout(vin));
            }
            let (next, _) = self
                .released
                .wait_timeout(held, deadline - now)
                .map_err(|_| LockError::Poisoned)?;
            held = next;
        }

        held.insert(vin);
        Ok(VinGuard { locks: self, vin })
    }

    pub fn is_held(&self, vin: Vin) -> bool {
        self.held
            .lock()
            .map(|held| held.contains(&vin))
            .unwrap_or(false)
    }
}

/// Releases its VIN on drop.
#[derive(Debug)]
pub struct VinGuard<'a> {
    locks: &'a VinLocks,
    vin: Vin,
}

impl VinGuard<'_> {
    pub fn vin(&self) -> Vin {
        self.vin
    }
}

impl Drop for VinGuard<'_> {
    fn drop(&mut self) {
        // Release even after a panic elsewhere poisoned the table.
        let mut held = self.locks.held.lock().unwrap_or_else(PoisonError::into_inner);
        held.remove(&self.vin);
        drop(held);
        self.locks.released.notify_all();
    }
}
