//! Rendering-surface pool — the single piece of shared mutable state.
//!
//! Bounded by a semaphore: at most `capacity` surfaces are leased at once,
//! and `acquire` queues past that. Every lease returns its surface on Drop,
//! on every exit path; `poison` discards the surface instead so a broken one
//! is never reused (the slot itself is always released — a leaked slot would
//! permanently shrink capacity).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Returned when the pool's semaphore has been closed. The pool never closes
/// it during normal operation, so callers treat this as fatal.
#[derive(Debug, Error)]
#[error("rendering surface pool is shut down")]
pub struct PoolClosed;

pub struct SurfacePool<S> {
    semaphore: Arc<Semaphore>,
    idle: Arc<Mutex<Vec<S>>>,
    capacity: usize,
}

impl<S> SurfacePool<S> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            idle: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    /// Waits for a free slot, then hands out a lease. The lease may carry an
    /// idle surface from an earlier request; when `surface()` is `None` the
    /// caller launches one and `attach`es it.
    pub async fn acquire(&self) -> Result<SurfaceLease<S>, PoolClosed> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| PoolClosed)?;
        let surface = lock_unpoisoned(&self.idle).pop();
        Ok(SurfaceLease {
            surface,
            idle: Arc::clone(&self.idle),
            _permit: permit,
            poisoned: false,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free (not leased).
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Surfaces parked in the pool awaiting reuse.
    pub fn idle_count(&self) -> usize {
        lock_unpoisoned(&self.idle).len()
    }
}

/// One leased slot, optionally carrying a live surface.
pub struct SurfaceLease<S> {
    surface: Option<S>,
    idle: Arc<Mutex<Vec<S>>>,
    _permit: OwnedSemaphorePermit,
    poisoned: bool,
}

impl<S> SurfaceLease<S> {
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Installs a freshly launched surface into the lease; a clean Drop then
    /// parks it in the pool for the next request.
    pub fn attach(&mut self, surface: S) {
        self.surface = Some(surface);
    }

    /// Marks the surface unusable: Drop discards it instead of parking it.
    /// The next acquire on this slot launches a replacement lazily.
    pub fn poison(&mut self) {
        self.poisoned = true;
    }
}

impl<S> Drop for SurfaceLease<S> {
    fn drop(&mut self) {
        if self.poisoned {
            self.surface = None;
            return;
        }
        if let Some(surface) = self.surface.take() {
            lock_unpoisoned(&self.idle).push(surface);
        }
    }
}

/// A poisoned std mutex only means another thread panicked mid-push; the Vec
/// inside is still structurally sound, so keep serving.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
