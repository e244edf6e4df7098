//! Storage medium error types
//!
//! Medium drivers map their HAL-specific failures to these variants. The
//! NVM engine translates them into its own status codes at the call site.

use core::fmt;

/// Result type for medium operations
pub type Result<T> = core::result::Result<T, MediumError>;

/// Errors reported by a storage medium driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MediumError {
    /// Address or range outside the medium, or not aligned as required
    InvalidAddress,
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
    /// Erase operation failed
    EraseFailed,
    /// Operation did not complete in time
    Timeout,
    /// Medium is busy with a previous operation
    Busy,
}

impl fmt::Display for MediumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumError::InvalidAddress => write!(f, "invalid medium address"),
            MediumError::ReadFailed => write!(f, "medium read failed"),
            MediumError::WriteFailed => write!(f, "medium write failed"),
            MediumError::EraseFailed => write!(f, "medium erase failed"),
            MediumError::Timeout => write!(f, "medium operation timed out"),
            MediumError::Busy => write!(f, "medium busy"),
        }
    }
}
