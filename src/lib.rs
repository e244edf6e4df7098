#![cfg_attr(not(test), no_std)]

//! envirostat-nvm - Non-volatile configuration storage for the envirostat
//! environmental controller
//!
//! This crate implements the block-oriented NVM service that keeps the
//! controller's configuration records (system settings, sensor calibration,
//! device identity, log cursor) durable across power cycles on
//! sector-erasable flash.
//!
//! # Architecture
//!
//! - [`platform`]: storage medium abstraction (trait, errors, mock)
//! - [`nvm`]: block registry, runtime cache, CRC16 codec, physical layout
//!   and the commit/format persistence engine
//!
//! Callers interact with [`nvm::NvmService`]: `read`/`write` operate on the
//! in-memory cache only; `commit`/`format` are the sole operations that
//! touch the physical medium.

// Storage medium abstraction layer
pub mod platform;

// Block registry, runtime cache and persistence engine
pub mod nvm;
