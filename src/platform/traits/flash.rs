//! Storage medium interface trait
//!
//! The NVM engine persists its block records through this trait. Driver
//! implementations wrap the actual flash or EEPROM peripheral.

use crate::platform::Result;

/// Byte-addressable, sector-erasable storage medium
///
/// # Medium characteristics
///
/// - Erase granularity is one sector (typically 4 KiB); erasing sets every
///   byte in the sector to 0xFF
/// - Writes can only clear bits (1 -> 0), so the target range must be erased
///   before a write is meaningful
/// - Write and erase are blocking and may take sector-erase-scale latency
///   (100 ms+); the engine only performs them inside commit/format
///
/// # Invariants
///
/// - One owner per medium instance; the engine never calls the driver
///   concurrently with itself
/// - Implementations must reject out-of-bounds addresses rather than wrap
pub trait StorageMedium {
    /// Read exactly `buf.len()` bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// `MediumError::InvalidAddress` if the range is out of bounds,
    /// `MediumError::ReadFailed` if the read itself fails.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address`.
    ///
    /// The target range must have been erased first; writing can only clear
    /// bits.
    ///
    /// # Errors
    ///
    /// `MediumError::InvalidAddress` if the range is out of bounds,
    /// `MediumError::WriteFailed` if the write itself fails.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase the full sector containing `address`.
    ///
    /// `address` must be sector-aligned. Sets every byte of the sector to
    /// 0xFF.
    ///
    /// # Errors
    ///
    /// `MediumError::InvalidAddress` if `address` is out of bounds or not
    /// sector-aligned, `MediumError::EraseFailed` if the erase itself fails.
    fn erase(&mut self, address: u32) -> Result<()>;

    /// Minimum erasable unit size in bytes (typically 4096).
    fn sector_size(&self) -> u32;

    /// Total medium capacity in bytes.
    fn capacity(&self) -> u32;
}
