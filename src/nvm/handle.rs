//! Lock-guarded shared service handle
//!
//! [`SharedNvm`] serializes every public operation of an [`NvmService`]
//! behind one critical-section mutex so independent tasks can share the
//! service. There is no per-block locking: a read of one block contends
//! with a commit flushing another, and commit/format hold the lock for the
//! full sector-erase latency.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};

use crate::platform::StorageMedium;

use super::error::{CommitOutcome, NvmError};
use super::service::{NvmService, NvmStats};

/// Shared, lock-guarded NVM service
///
/// `const`-constructible, so it can live in a `static`:
///
/// ```ignore
/// static NVM: SharedNvm<Rp2350Flash> =
///     SharedNvm::new(NvmService::new(Rp2350Flash::new(), &DEVICE_BLOCKS, NVM_BASE_ADDRESS));
/// ```
pub struct SharedNvm<M: StorageMedium> {
    inner: Mutex<CriticalSectionRawMutex, RefCell<NvmService<M>>>,
}

impl<M: StorageMedium> SharedNvm<M> {
    /// Wrap a service for shared access
    pub const fn new(service: NvmService<M>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(service)),
        }
    }

    /// Run `f` with exclusive access to the service
    ///
    /// Returns `Busy` if the service is already borrowed on this execution
    /// context (reentrant acquisition) instead of deadlocking.
    pub fn with<R>(
        &self,
        f: impl FnOnce(&mut NvmService<M>) -> Result<R, NvmError>,
    ) -> Result<R, NvmError> {
        self.inner.lock(|cell| {
            let mut service = cell.try_borrow_mut().map_err(|_| NvmError::Busy)?;
            f(&mut service)
        })
    }

    /// See [`NvmService::init`]
    pub fn init(&self) -> Result<(), NvmError> {
        self.with(|s| s.init())
    }

    /// See [`NvmService::deinit`]
    pub fn deinit(&self) -> Result<(), NvmError> {
        self.with(|s| s.deinit())
    }

    /// See [`NvmService::read`]
    pub fn read(&self, id: usize, out: &mut [u8]) -> Result<(), NvmError> {
        self.with(|s| s.read(id, out))
    }

    /// See [`NvmService::write`]
    pub fn write(&self, id: usize, data: &[u8]) -> Result<(), NvmError> {
        self.with(|s| s.write(id, data))
    }

    /// See [`NvmService::commit`]
    pub fn commit(&self) -> Result<CommitOutcome, NvmError> {
        self.with(|s| s.commit())
    }

    /// See [`NvmService::format`]
    pub fn format(&self) -> Result<(), NvmError> {
        self.with(|s| s.format())
    }

    /// See [`NvmService::stats`]
    pub fn stats(&self) -> Result<NvmStats, NvmError> {
        self.with(|s| Ok(s.stats()))
    }
}
