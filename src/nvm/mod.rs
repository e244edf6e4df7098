//! NVM block-storage service
//!
//! Keeps a fixed registry of configuration blocks durable on a
//! sector-erasable medium, each block stored as payload bytes followed by a
//! CRC16 trailer.
//!
//! # Components
//!
//! - [`registry`]: immutable block descriptor table
//! - [`state`]: per-block runtime cache record (data, loaded, dirty)
//! - [`crc`]: CRC16 integrity codec
//! - [`layout`]: block id to physical address mapping
//! - [`service`]: the persistence engine ([`NvmService`])
//! - [`handle`]: lock-guarded shared handle (feature `embassy`)
//!
//! # Example
//!
//! ```
//! use envirostat_nvm::nvm::{NvmService, registry};
//! use envirostat_nvm::platform::mock::MockFlash;
//!
//! let mut service = NvmService::new(MockFlash::new(), &registry::DEVICE_BLOCKS, 0);
//! service.init().unwrap();
//!
//! let mut settings = [0u8; registry::SETTINGS_SIZE];
//! service.read(registry::BLOCK_SETTINGS, &mut settings).unwrap();
//!
//! settings[0] = 0x10;
//! service.write(registry::BLOCK_SETTINGS, &settings).unwrap();
//! service.commit().unwrap();
//! ```

pub mod crc;
pub mod error;
pub mod layout;
pub mod registry;
pub mod service;
pub mod state;

#[cfg(feature = "embassy")]
pub mod handle;

pub use error::{CommitOutcome, NvmError};
pub use registry::{BlockDescriptor, BlockFlags, MAX_BLOCKS, MAX_BLOCK_SIZE};
pub use service::{NvmService, NvmStats};

#[cfg(feature = "embassy")]
pub use handle::SharedNvm;
