//! Storage medium abstraction layer
//!
//! This module isolates everything hardware-specific behind the
//! [`StorageMedium`] trait. The NVM engine only ever talks to the medium
//! through this interface, so it can run against on-chip flash, an external
//! EEPROM, or the in-memory mock used by the test suite.

pub mod error;
pub mod traits;

// Mock medium (host tests and simulation builds)
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{MediumError, Result};
pub use traits::StorageMedium;
