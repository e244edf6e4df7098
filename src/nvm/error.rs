//! NVM service status codes

use core::fmt;

/// Errors surfaced by NVM service operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NvmError {
    /// Unclassified failure
    GenericError,
    /// Invalid argument (empty buffer, malformed block registry)
    InvalidParam,
    /// Service has not been initialized
    NotInitialized,
    /// Service is already initialized
    AlreadyInitialized,
    /// Service or medium is busy
    Busy,
    /// Medium operation timed out
    Timeout,
    /// Stored checksum does not match the payload
    CrcError,
    /// Physical read failed
    ReadError,
    /// Physical write failed
    WriteError,
    /// Physical erase failed
    EraseError,
    /// Block id outside the registry
    InvalidBlockId,
    /// Buffer length incompatible with the block's configured size
    DataTooLarge,
    /// Block is factory-sealed and cannot be written
    WriteProtected,
}

impl fmt::Display for NvmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NvmError::GenericError => write!(f, "generic NVM error"),
            NvmError::InvalidParam => write!(f, "invalid parameter"),
            NvmError::NotInitialized => write!(f, "NVM service not initialized"),
            NvmError::AlreadyInitialized => write!(f, "NVM service already initialized"),
            NvmError::Busy => write!(f, "NVM service busy"),
            NvmError::Timeout => write!(f, "medium operation timed out"),
            NvmError::CrcError => write!(f, "checksum mismatch"),
            NvmError::ReadError => write!(f, "physical read failed"),
            NvmError::WriteError => write!(f, "physical write failed"),
            NvmError::EraseError => write!(f, "physical erase failed"),
            NvmError::InvalidBlockId => write!(f, "invalid block id"),
            NvmError::DataTooLarge => write!(f, "buffer length exceeds block size"),
            NvmError::WriteProtected => write!(f, "block is write-protected"),
        }
    }
}

/// Successful outcome of a commit pass
///
/// Distinguishes "flushed dirty blocks" from "nothing to do" so callers can
/// skip follow-up work when the medium was not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommitOutcome {
    /// At least one dirty block was written to the medium
    Written,
    /// No block was dirty; the medium was not touched
    NoChanges,
}
