//! Mock storage medium for testing
//!
//! In-memory flash simulation with the failure modes the NVM engine has to
//! survive: corrupted sectors, failing read/write/erase operations, and
//! bit-clearing write semantics. Also records every write and erase so
//! tests can assert which physical operations a commit actually issued.

use crate::platform::{MediumError, Result, StorageMedium};

/// Erase sector size (4 KiB, matching typical NOR flash)
pub const MOCK_SECTOR_SIZE: u32 = 4096;

/// Number of simulated sectors
pub const MOCK_SECTOR_COUNT: usize = 8;

/// Total simulated capacity
pub const MOCK_CAPACITY: u32 = MOCK_SECTOR_SIZE * MOCK_SECTOR_COUNT as u32;

/// Maximum number of operations retained in the spy logs
const OP_LOG_CAPACITY: usize = 64;

/// Mock flash medium
///
/// Simulates flash storage in memory. Supports:
/// - Read/write/erase with real flash semantics (erase to 0xFF, writes can
///   only clear bits)
/// - Corruption injection for integrity-recovery tests
/// - Fault injection per operation kind
/// - Write/erase spy logs and per-sector erase counters
///
/// # Example
///
/// ```
/// use envirostat_nvm::platform::mock::MockFlash;
/// use envirostat_nvm::platform::StorageMedium;
///
/// let mut flash = MockFlash::new();
/// flash.erase(0).unwrap();
/// flash.write(0, &[0x42; 4]).unwrap();
///
/// let mut buf = [0u8; 4];
/// flash.read(0, &mut buf).unwrap();
/// assert_eq!(buf, [0x42; 4]);
/// assert_eq!(flash.erase_count(0), 1);
/// ```
pub struct MockFlash {
    /// Simulated storage, 0xFF in the erased state
    storage: [u8; MOCK_CAPACITY as usize],
    /// Erase count per sector
    erase_counts: [u32; MOCK_SECTOR_COUNT],
    /// (address, length) of every successful write
    write_log: heapless::Vec<(u32, usize), OP_LOG_CAPACITY>,
    /// Sector address of every successful erase
    erase_log: heapless::Vec<u32, OP_LOG_CAPACITY>,
    fail_reads: bool,
    fail_writes: bool,
    fail_erases: bool,
}

impl MockFlash {
    /// Create a fully erased mock flash
    pub fn new() -> Self {
        Self {
            storage: [0xFF; MOCK_CAPACITY as usize],
            erase_counts: [0; MOCK_SECTOR_COUNT],
            write_log: heapless::Vec::new(),
            erase_log: heapless::Vec::new(),
            fail_reads: false,
            fail_writes: false,
            fail_erases: false,
        }
    }

    /// Get a view of the medium contents (for test verification)
    pub fn contents(&self, address: u32, len: usize) -> &[u8] {
        &self.storage[address as usize..address as usize + len]
    }

    /// Overwrite raw bytes directly, bypassing flash write semantics
    ///
    /// Used to stage pre-existing medium contents for load tests.
    pub fn preload(&mut self, address: u32, data: &[u8]) {
        self.storage[address as usize..address as usize + data.len()].copy_from_slice(data);
    }

    /// Inject corruption at `address` (0xAA pattern)
    pub fn inject_corruption(&mut self, address: u32, len: usize) {
        for byte in &mut self.storage[address as usize..address as usize + len] {
            *byte = 0xAA;
        }
    }

    /// Make all subsequent reads fail until cleared
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make all subsequent writes fail until cleared
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make all subsequent erases fail until cleared
    pub fn set_fail_erases(&mut self, fail: bool) {
        self.fail_erases = fail;
    }

    /// Number of times the sector containing `address` has been erased
    pub fn erase_count(&self, address: u32) -> u32 {
        self.erase_counts[(address / MOCK_SECTOR_SIZE) as usize]
    }

    /// Every successful write so far, as (address, length)
    pub fn writes(&self) -> &[(u32, usize)] {
        &self.write_log
    }

    /// Every successful erase so far, as sector addresses
    pub fn erases(&self) -> &[u32] {
        &self.erase_log
    }

    /// Clear the write/erase spy logs
    pub fn clear_op_log(&mut self) {
        self.write_log.clear();
        self.erase_log.clear();
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageMedium for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        if self.fail_reads {
            return Err(MediumError::ReadFailed);
        }
        if address as usize + buf.len() > MOCK_CAPACITY as usize {
            return Err(MediumError::InvalidAddress);
        }

        buf.copy_from_slice(&self.storage[address as usize..address as usize + buf.len()]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(MediumError::WriteFailed);
        }
        if address as usize + data.len() > MOCK_CAPACITY as usize {
            return Err(MediumError::InvalidAddress);
        }

        // Flash can only clear bits (1 -> 0)
        for (i, byte) in data.iter().enumerate() {
            self.storage[address as usize + i] &= byte;
        }
        self.write_log.push((address, data.len())).ok();
        Ok(())
    }

    fn erase(&mut self, address: u32) -> Result<()> {
        if self.fail_erases {
            return Err(MediumError::EraseFailed);
        }
        if address >= MOCK_CAPACITY {
            return Err(MediumError::InvalidAddress);
        }
        if address % MOCK_SECTOR_SIZE != 0 {
            return Err(MediumError::InvalidAddress);
        }

        let start = address as usize;
        for byte in &mut self.storage[start..start + MOCK_SECTOR_SIZE as usize] {
            *byte = 0xFF;
        }
        self.erase_counts[(address / MOCK_SECTOR_SIZE) as usize] += 1;
        self.erase_log.push(address).ok();
        Ok(())
    }

    fn sector_size(&self) -> u32 {
        MOCK_SECTOR_SIZE
    }

    fn capacity(&self) -> u32 {
        MOCK_CAPACITY
    }
}
