//! Storage medium traits
//!
//! Defines the interface a medium driver must provide to the NVM engine.

pub mod flash;

pub use flash::StorageMedium;
