//! VIN allocation for newly added vehicles.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use dealership_core::{DomainError, DomainResult, Vin};

use crate::repository::VehicleRepository;

/// Draws after which allocation gives up. With 900 million candidates this is
/// only reachable on an almost full lot or a broken generator.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Generates VINs that a [`VehicleRepository`] has never issued.
///
/// The random source is pluggable so tests can use a seeded generator.
/// Allocation does not reserve the VIN; a concurrent fixed-VIN `add` can still
/// win it, in which case that `add` succeeds and the later one reports
/// `DuplicateVin`.
#[derive(Debug)]
pub struct VinAllocator<R = StdRng> {
    rng: Mutex<R>,
    max_attempts: usize,
}

impl VinAllocator<StdRng> {
    /// Deterministic allocator: the same seed yields the same VIN sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: RngCore> VinAllocator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Draw a VIN in `[100000000, 999999999]` that `repo` has never issued,
    /// so VINs of sold, leased, or removed vehicles are skipped too.
    pub fn allocate<V>(&self, repo: &V) -> DomainResult<Vin>
    where
        V: VehicleRepository + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.draw()?;
            if !repo.is_issued(candidate)? {
                return Ok(candidate);
            }
            tracing::debug!(vin = %candidate, attempt, "VIN collision, redrawing");
        }
        Err(DomainError::validation(format!(
            "could not allocate a free VIN after {} attempts",
            self.max_attempts
        )))
    }

    fn draw(&self) -> DomainResult<Vin> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| DomainError::storage("VIN allocator lock poisoned"))?;
        Vin::new(rng.gen_range(Vin::MIN..=Vin::MAX))
    }
}
