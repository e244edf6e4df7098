//! NVM persistence engine
//!
//! [`NvmService`] orchestrates load-on-demand, write-back and factory reset
//! over a [`StorageMedium`]. Reads and writes are served from the runtime
//! cache; only `commit` and `format` perform physical I/O.
//!
//! The service is an explicit object: construct it once at startup with the
//! device's block registry and hand it to callers by reference (or through
//! [`super::handle::SharedNvm`] when tasks run concurrently).

use crate::platform::{MediumError, StorageMedium};

use super::crc::{calculate_crc16, validate_crc16, CRC_SIZE};
use super::error::{CommitOutcome, NvmError};
use super::layout;
use super::registry::{BlockDescriptor, BlockFlags, MAX_BLOCKS, MAX_BLOCK_SIZE};
use super::state::BlockState;

/// Capacity of the on-stack frame buffer (largest record: payload + trailer)
const FRAME_CAPACITY: usize = MAX_BLOCK_SIZE + CRC_SIZE;

/// Engine activity counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NvmStats {
    /// Commit passes that flushed at least one block
    pub commits: u32,
    /// Individual block records written to the medium
    pub blocks_written: u32,
    /// Blocks whose stored checksum failed validation at load
    pub crc_recoveries: u32,
    /// Blocks whose physical read failed at load
    pub load_faults: u32,
}

impl NvmStats {
    const fn new() -> Self {
        Self {
            commits: 0,
            blocks_written: 0,
            crc_recoveries: 0,
            load_faults: 0,
        }
    }
}

impl Default for NvmStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Block-oriented non-volatile storage service
///
/// One record per registry entry, stored as `size` payload bytes followed
/// by a CRC16 trailer at the address computed by [`layout`]. A block whose
/// stored record fails validation is transparently restored to its factory
/// default and flagged dirty, so the next commit heals the medium.
pub struct NvmService<M: StorageMedium> {
    medium: M,
    registry: &'static [BlockDescriptor],
    base_address: u32,
    states: heapless::Vec<BlockState, MAX_BLOCKS>,
    initialized: bool,
    stats: NvmStats,
}

impl<M: StorageMedium> NvmService<M> {
    /// Create a service over `medium` for the given block registry
    ///
    /// `base_address` is the sector-aligned start of the NVM region. The
    /// service starts uninitialized; call [`init`](Self::init) before any
    /// other operation.
    pub const fn new(medium: M, registry: &'static [BlockDescriptor], base_address: u32) -> Self {
        Self {
            medium,
            registry,
            base_address,
            states: heapless::Vec::new(),
            initialized: false,
            stats: NvmStats::new(),
        }
    }

    /// Validate the registry and load every block from the medium
    ///
    /// Registry violations (non-dense ids, zero or oversized block, default
    /// payload length mismatch, footprint exceeding the medium) fail with
    /// `InvalidParam` before any state is touched. Per-block load failures
    /// are not fatal: a block whose record is missing, unreadable or fails
    /// its checksum is cached as the factory default and flagged dirty.
    pub fn init(&mut self) -> Result<(), NvmError> {
        if self.initialized {
            return Err(NvmError::AlreadyInitialized);
        }
        self.validate_registry()?;

        self.states.clear();
        for _ in self.registry {
            // Capacity checked by validate_registry
            self.states.push(BlockState::new()).ok();
        }
        for id in 0..self.registry.len() {
            self.load_block(id);
        }

        self.initialized = true;
        #[cfg(feature = "defmt")]
        defmt::info!("nvm: {} blocks loaded", self.registry.len());
        Ok(())
    }

    /// Tear the service down, flushing pending changes opportunistically
    ///
    /// A commit failure is reported to the log but never blocks teardown;
    /// the service always ends up uninitialized.
    pub fn deinit(&mut self) -> Result<(), NvmError> {
        if !self.initialized {
            return Err(NvmError::NotInitialized);
        }

        if self.commit().is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("nvm: commit failed during teardown, changes lost");
        }

        self.states.clear();
        self.initialized = false;
        Ok(())
    }

    /// Copy the cached value of block `id` into `out`
    ///
    /// `out` must hold at least the block's configured size; exactly that
    /// many bytes are written to its prefix. Loads the block first if no
    /// access has touched it yet; no other physical I/O.
    pub fn read(&mut self, id: usize, out: &mut [u8]) -> Result<(), NvmError> {
        if !self.initialized {
            return Err(NvmError::NotInitialized);
        }
        if id >= self.registry.len() {
            return Err(NvmError::InvalidBlockId);
        }
        if out.is_empty() {
            return Err(NvmError::InvalidParam);
        }
        let size = self.registry[id].size;
        if out.len() < size {
            return Err(NvmError::DataTooLarge);
        }

        self.ensure_loaded(id);
        out[..size].copy_from_slice(&self.states[id].data);
        Ok(())
    }

    /// Update the cached value of block `id` with `data`
    ///
    /// `data` may be shorter than the block; bytes beyond `data.len()` keep
    /// their current value. Writing bytes identical to the cache is a no-op
    /// that does not mark the block dirty. Never touches the medium.
    pub fn write(&mut self, id: usize, data: &[u8]) -> Result<(), NvmError> {
        if !self.initialized {
            return Err(NvmError::NotInitialized);
        }
        if id >= self.registry.len() {
            return Err(NvmError::InvalidBlockId);
        }
        if data.is_empty() {
            return Err(NvmError::InvalidParam);
        }
        let block = self.registry[id];
        if data.len() > block.size {
            return Err(NvmError::DataTooLarge);
        }
        if block.flags.contains(BlockFlags::WRITE_PROTECTED) {
            return Err(NvmError::WriteProtected);
        }

        // Load first so a partial-length write keeps the tail intact
        self.ensure_loaded(id);
        let state = &mut self.states[id];
        if state.data[..data.len()] != *data {
            state.data[..data.len()].copy_from_slice(data);
            state.dirty = true;
        }
        Ok(())
    }

    /// Flush every dirty block to the medium
    ///
    /// Erases and rewrites each dirty block's record, clearing its dirty
    /// flag on success. Processing continues past per-block failures; the
    /// first error encountered is returned after all blocks were attempted,
    /// and failed blocks stay dirty for a later retry. With no dirty block
    /// the medium is not touched and `NoChanges` is returned.
    pub fn commit(&mut self) -> Result<CommitOutcome, NvmError> {
        if !self.initialized {
            return Err(NvmError::NotInitialized);
        }

        let mut first_err = None;
        let mut any_dirty = false;
        for id in 0..self.registry.len() {
            if !self.states[id].dirty {
                continue;
            }
            any_dirty = true;
            match self.commit_block(id) {
                Ok(()) => {
                    self.states[id].dirty = false;
                    self.stats.blocks_written += 1;
                }
                Err(e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("nvm: commit of block {} failed", id);
                    first_err.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_err {
            return Err(e);
        }
        if !any_dirty {
            return Ok(CommitOutcome::NoChanges);
        }
        self.stats.commits += 1;
        Ok(CommitOutcome::Written)
    }

    /// Factory reset: restore every block to its default and persist it
    ///
    /// The cache is fully defaulted up front, so RAM is consistent even
    /// when physical writes fail. Every block is erased and rewritten, not
    /// just dirty ones; the first failure is reported after all blocks were
    /// attempted, and failed blocks stay dirty.
    pub fn format(&mut self) -> Result<(), NvmError> {
        if !self.initialized {
            return Err(NvmError::NotInitialized);
        }

        let registry = self.registry;
        for (id, block) in registry.iter().enumerate() {
            self.states[id].fill(block.default, true);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("nvm: factory reset");

        let mut first_err = None;
        for id in 0..registry.len() {
            match self.commit_block(id) {
                Ok(()) => {
                    self.states[id].dirty = false;
                    self.stats.blocks_written += 1;
                }
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Re-read block `id` from the medium and check its stored checksum
    ///
    /// Diagnostic operation; does not modify the cache or the medium.
    pub fn verify(&mut self, id: usize) -> Result<(), NvmError> {
        if !self.initialized {
            return Err(NvmError::NotInitialized);
        }
        if id >= self.registry.len() {
            return Err(NvmError::InvalidBlockId);
        }

        let registry = self.registry;
        let block = &registry[id];
        let offset =
            layout::record_offset(registry, id, self.base_address, self.medium.sector_size());

        let mut frame: heapless::Vec<u8, FRAME_CAPACITY> = heapless::Vec::new();
        frame.resize(block.size + CRC_SIZE, 0).ok();
        self.medium
            .read(offset, &mut frame)
            .map_err(|e| medium_error(e, NvmError::ReadError))?;

        let (payload, trailer) = frame.split_at(block.size);
        let stored = u16::from_le_bytes([trailer[0], trailer[1]]);
        if !validate_crc16(payload, stored) {
            return Err(NvmError::CrcError);
        }
        Ok(())
    }

    /// Whether `init` has completed and `deinit` has not run
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether block `id` has uncommitted changes
    pub fn is_dirty(&self, id: usize) -> Option<bool> {
        self.states.get(id).map(|s| s.dirty)
    }

    /// Engine activity counters
    pub fn stats(&self) -> NvmStats {
        self.stats
    }

    /// Borrow the underlying medium
    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// Borrow the underlying medium mutably
    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    /// Consume the service, handing back the medium
    pub fn into_medium(self) -> M {
        self.medium
    }

    fn validate_registry(&self) -> Result<(), NvmError> {
        let registry = self.registry;
        if registry.is_empty() || registry.len() > MAX_BLOCKS {
            return Err(NvmError::InvalidParam);
        }
        for (index, block) in registry.iter().enumerate() {
            if block.id != index {
                return Err(NvmError::InvalidParam);
            }
            if block.size == 0 || block.size > MAX_BLOCK_SIZE {
                return Err(NvmError::InvalidParam);
            }
            if block.default.len() != block.size {
                return Err(NvmError::InvalidParam);
            }
        }

        let sector_size = self.medium.sector_size();
        if self.base_address % sector_size != 0 {
            return Err(NvmError::InvalidParam);
        }
        let footprint = layout::total_footprint(registry, sector_size);
        if self.base_address + footprint > self.medium.capacity() {
            return Err(NvmError::InvalidParam);
        }
        Ok(())
    }

    /// Populate block `id` from the medium, falling back to the default
    ///
    /// Checksum mismatch and physical read failure both recover locally:
    /// the cache gets the factory default and the block is flagged dirty so
    /// the next commit rewrites the record. Never fails.
    fn load_block(&mut self, id: usize) {
        let registry = self.registry;
        let block = &registry[id];
        let offset =
            layout::record_offset(registry, id, self.base_address, self.medium.sector_size());

        let mut frame: heapless::Vec<u8, FRAME_CAPACITY> = heapless::Vec::new();
        frame.resize(block.size + CRC_SIZE, 0).ok();

        match self.medium.read(offset, &mut frame) {
            Ok(()) => {
                let (payload, trailer) = frame.split_at(block.size);
                let stored = u16::from_le_bytes([trailer[0], trailer[1]]);
                if validate_crc16(payload, stored) {
                    self.states[id].fill(payload, false);
                } else {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("nvm: block {} failed validation, using defaults", id);
                    self.stats.crc_recoveries += 1;
                    self.states[id].fill(block.default, true);
                }
            }
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("nvm: block {} unreadable, using defaults", id);
                self.stats.load_faults += 1;
                self.states[id].fill(block.default, true);
            }
        }
    }

    fn ensure_loaded(&mut self, id: usize) {
        if !self.states[id].loaded {
            self.load_block(id);
        }
    }

    /// Erase the sector(s) spanned by block `id` and write its record
    fn commit_block(&mut self, id: usize) -> Result<(), NvmError> {
        let registry = self.registry;
        let block = &registry[id];
        let sector_size = self.medium.sector_size();
        let offset = layout::record_offset(registry, id, self.base_address, sector_size);
        let record_len = (block.size + CRC_SIZE) as u32;

        let first = layout::containing_sector(offset, sector_size);
        let last = layout::containing_sector(offset + record_len - 1, sector_size);
        let mut sector = first;
        loop {
            self.medium
                .erase(sector)
                .map_err(|e| medium_error(e, NvmError::EraseError))?;
            if sector == last {
                break;
            }
            sector += sector_size;
        }

        let mut frame: heapless::Vec<u8, FRAME_CAPACITY> = heapless::Vec::new();
        frame.extend_from_slice(&self.states[id].data).ok();
        frame
            .extend_from_slice(&calculate_crc16(&self.states[id].data).to_le_bytes())
            .ok();

        self.medium
            .write(offset, &frame)
            .map_err(|e| medium_error(e, NvmError::WriteError))
    }
}

/// Map a medium failure to the engine's status surface
///
/// Timeout and busy conditions keep their identity; everything else is
/// classified by the operation that failed.
fn medium_error(e: MediumError, fallback: NvmError) -> NvmError {
    match e {
        MediumError::Timeout => NvmError::Timeout,
        MediumError::Busy => NvmError::Busy,
        _ => fallback,
    }
}
