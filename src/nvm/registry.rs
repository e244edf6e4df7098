//! Block registry
//!
//! Immutable, compile-time table of the configuration blocks the controller
//! persists. Each descriptor fixes a block's id, payload size and factory
//! default; the engine validates the whole table once at init and never
//! mutates it.

use bitflags::bitflags;

/// Maximum payload size of a single block, in bytes
pub const MAX_BLOCK_SIZE: usize = 256;

/// Maximum number of blocks in a registry
pub const MAX_BLOCKS: usize = 16;

/// Base address of the NVM region on the device medium
///
/// Everything below this address belongs to the firmware image and is never
/// touched by the engine.
pub const NVM_BASE_ADDRESS: u32 = 0x040000;

bitflags! {
    /// Per-block behavior flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlockFlags: u8 {
        /// Block is factory-sealed; `write` is rejected, `format` still
        /// resets it to the default payload
        const WRITE_PROTECTED = 0b0000_0001;
    }
}

/// Descriptor of one persisted configuration block
#[derive(Debug, Clone, Copy)]
pub struct BlockDescriptor {
    /// Dense block id, equal to the descriptor's index in the table
    pub id: usize,
    /// Payload size in bytes, `1..=MAX_BLOCK_SIZE`
    pub size: usize,
    /// Factory default payload, exactly `size` bytes
    ///
    /// Used on first boot and whenever the stored record fails validation.
    pub default: &'static [u8],
    /// Behavior flags
    pub flags: BlockFlags,
}

// ---------------------------------------------------------------------------
// Device block table
// ---------------------------------------------------------------------------

/// System settings block id
pub const BLOCK_SETTINGS: usize = 0;
/// Sensor calibration block id
pub const BLOCK_CALIBRATION: usize = 1;
/// Device identity block id
pub const BLOCK_IDENTITY: usize = 2;
/// Event log cursor block id
pub const BLOCK_LOG_CURSOR: usize = 3;

/// System settings payload size
pub const SETTINGS_SIZE: usize = 32;
/// Calibration payload size
pub const CALIBRATION_SIZE: usize = 24;
/// Identity payload size
pub const IDENTITY_SIZE: usize = 16;
/// Log cursor payload size
pub const LOG_CURSOR_SIZE: usize = 8;

/// Factory defaults for the system settings block
///
/// Layout (little-endian):
/// - 0..2   temperature setpoint, centi-degC (default 22.00 C)
/// - 2..4   relative humidity setpoint, centi-% (default 55.00 %)
/// - 4..6   temperature hysteresis, centi-degC (default 0.50 C)
/// - 6..8   sensor sample period, seconds (default 30 s)
/// - 8      fan mode (0 = auto)
/// - 9      damper mode (0 = auto)
/// - 10..12 alarm flags (default none)
/// - 12..32 reserved, zero
const SETTINGS_DEFAULT: [u8; SETTINGS_SIZE] = [
    0x98, 0x08, // 2200
    0x7C, 0x15, // 5500
    0x32, 0x00, // 50
    0x1E, 0x00, // 30
    0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00,
];

/// Factory defaults for the sensor calibration block
///
/// Three channels (temperature, humidity, pressure), each an f32 scale
/// followed by an f32 offset, little-endian. Defaults are identity
/// (scale 1.0, offset 0.0).
const CALIBRATION_DEFAULT: [u8; CALIBRATION_SIZE] = [
    0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00, // temperature
    0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00, // humidity
    0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x00, 0x00, // pressure
];

/// Factory default for the device identity block
///
/// Serial number and hardware revision are programmed at the factory; the
/// unprogrammed state is all-0xFF, matching erased flash.
const IDENTITY_DEFAULT: [u8; IDENTITY_SIZE] = [0xFF; IDENTITY_SIZE];

/// Factory default for the event log cursor (u32 head, u32 wrap count)
const LOG_CURSOR_DEFAULT: [u8; LOG_CURSOR_SIZE] = [0x00; LOG_CURSOR_SIZE];

/// The envirostat controller's block table
pub static DEVICE_BLOCKS: [BlockDescriptor; 4] = [
    BlockDescriptor {
        id: BLOCK_SETTINGS,
        size: SETTINGS_SIZE,
        default: &SETTINGS_DEFAULT,
        flags: BlockFlags::empty(),
    },
    BlockDescriptor {
        id: BLOCK_CALIBRATION,
        size: CALIBRATION_SIZE,
        default: &CALIBRATION_DEFAULT,
        flags: BlockFlags::empty(),
    },
    BlockDescriptor {
        id: BLOCK_IDENTITY,
        size: IDENTITY_SIZE,
        default: &IDENTITY_DEFAULT,
        flags: BlockFlags::WRITE_PROTECTED,
    },
    BlockDescriptor {
        id: BLOCK_LOG_CURSOR,
        size: LOG_CURSOR_SIZE,
        default: &LOG_CURSOR_DEFAULT,
        flags: BlockFlags::empty(),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_table_is_dense() {
        for (index, block) in DEVICE_BLOCKS.iter().enumerate() {
            assert_eq!(block.id, index);
        }
    }

    #[test]
    fn test_device_table_sizes_valid() {
        for block in &DEVICE_BLOCKS {
            assert!(block.size >= 1);
            assert!(block.size <= MAX_BLOCK_SIZE);
            assert_eq!(block.default.len(), block.size);
        }
    }

    #[test]
    fn test_identity_block_is_sealed() {
        assert!(DEVICE_BLOCKS[BLOCK_IDENTITY]
            .flags
            .contains(BlockFlags::WRITE_PROTECTED));
        assert!(!DEVICE_BLOCKS[BLOCK_SETTINGS]
            .flags
            .contains(BlockFlags::WRITE_PROTECTED));
    }
}
