//! Mock medium implementations for testing

pub mod flash;

pub use flash::{MockFlash, MOCK_SECTOR_SIZE};
