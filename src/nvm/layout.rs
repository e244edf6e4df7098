//! Physical layout calculation
//!
//! Maps a block id to the medium address of its record. Every block owns
//! one or more whole erase sectors: a record never shares a sector with a
//! neighbor, so committing one block can erase its sector(s) without
//! destroying another block's persisted bytes. Records are placed at the
//! start of their region in ascending id order.

use super::crc::CRC_SIZE;
use super::registry::BlockDescriptor;

/// Number of whole sectors a block's record occupies
pub fn sectors_per_block(block: &BlockDescriptor, sector_size: u32) -> u32 {
    let record_len = (block.size + CRC_SIZE) as u32;
    record_len.div_ceil(sector_size)
}

/// Physical address of the record for block `id`
///
/// Sums the sector footprint of all preceding blocks; always
/// sector-aligned.
pub fn record_offset(
    blocks: &[BlockDescriptor],
    id: usize,
    base_address: u32,
    sector_size: u32,
) -> u32 {
    let preceding: u32 = blocks[..id]
        .iter()
        .map(|b| sectors_per_block(b, sector_size))
        .sum();
    base_address + preceding * sector_size
}

/// Start address of the erase sector containing `address`
pub fn containing_sector(address: u32, sector_size: u32) -> u32 {
    address - address % sector_size
}

/// Total medium footprint of a block table, in bytes
pub fn total_footprint(blocks: &[BlockDescriptor], sector_size: u32) -> u32 {
    blocks
        .iter()
        .map(|b| sectors_per_block(b, sector_size))
        .sum::<u32>()
        * sector_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nvm::registry::{BlockFlags, DEVICE_BLOCKS};

    const SECTOR: u32 = 4096;

    fn block(id: usize, size: usize) -> BlockDescriptor {
        BlockDescriptor {
            id,
            size,
            default: &[0; 8],
            flags: BlockFlags::empty(),
        }
    }

    #[test]
    fn test_small_blocks_get_one_sector_each() {
        let blocks = [block(0, 4), block(1, 8), block(2, 4)];

        assert_eq!(record_offset(&blocks, 0, 0, SECTOR), 0);
        assert_eq!(record_offset(&blocks, 1, 0, SECTOR), SECTOR);
        assert_eq!(record_offset(&blocks, 2, 0, SECTOR), 2 * SECTOR);
    }

    #[test]
    fn test_offsets_respect_base_address() {
        let blocks = [block(0, 4), block(1, 4)];

        assert_eq!(record_offset(&blocks, 1, 0x040000, SECTOR), 0x041000);
    }

    #[test]
    fn test_record_spanning_multiple_sectors() {
        // 4095-byte payload + 2-byte trailer needs two 4 KiB sectors
        let blocks = [block(0, 4095), block(1, 4)];

        assert_eq!(sectors_per_block(&blocks[0], SECTOR), 2);
        assert_eq!(record_offset(&blocks, 1, 0, SECTOR), 2 * SECTOR);
    }

    #[test]
    fn test_record_exactly_filling_sector() {
        let blocks = [block(0, SECTOR as usize - 2)];
        assert_eq!(sectors_per_block(&blocks[0], SECTOR), 1);
    }

    #[test]
    fn test_containing_sector() {
        assert_eq!(containing_sector(0, SECTOR), 0);
        assert_eq!(containing_sector(1, SECTOR), 0);
        assert_eq!(containing_sector(SECTOR - 1, SECTOR), 0);
        assert_eq!(containing_sector(SECTOR, SECTOR), SECTOR);
        assert_eq!(containing_sector(0x041234, SECTOR), 0x041000);
    }

    #[test]
    fn test_offsets_are_sector_aligned() {
        for id in 0..DEVICE_BLOCKS.len() {
            let offset = record_offset(&DEVICE_BLOCKS, id, 0x040000, SECTOR);
            assert_eq!(offset % SECTOR, 0);
        }
    }

    #[test]
    fn test_total_footprint() {
        let blocks = [block(0, 4), block(1, 4095)];
        assert_eq!(total_footprint(&blocks, SECTOR), 3 * SECTOR);
    }
}
