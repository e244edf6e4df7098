//! CRC16 calculation for block record validation
//!
//! Detects corrupted or stale block records on the medium. Each record
//! carries a CRC16 trailer computed over the payload bytes only, never over
//! the trailer itself.

use crc::{Crc, CRC_16_MODBUS};

/// CRC16 algorithm: reflected, polynomial 0xA001, initial value 0xFFFF
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Width of the CRC trailer on the medium, in bytes
pub const CRC_SIZE: usize = 2;

/// Calculate the CRC16 checksum of `data`
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

/// Validate `data` against a stored checksum
pub fn validate_crc16(data: &[u8], expected: u16) -> bool {
    calculate_crc16(data) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_check_value() {
        // Standard check value for this algorithm
        assert_eq!(calculate_crc16(b"123456789"), 0x4B37);
    }

    #[test]
    fn test_crc16_detects_corruption() {
        let data = b"calibration record";
        let crc = calculate_crc16(data);

        let mut corrupted = *data;
        corrupted[0] ^= 0x01;

        assert!(validate_crc16(data, crc));
        assert!(!validate_crc16(&corrupted, crc));
    }

    #[test]
    fn test_crc16_deterministic() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(calculate_crc16(&data), calculate_crc16(&data));
    }

    #[test]
    fn test_validate_rejects_wrong_checksum() {
        let data = b"payload";
        let crc = calculate_crc16(data);
        assert!(!validate_crc16(data, crc.wrapping_add(1)));
        assert!(!validate_crc16(data, 0));
    }
}
