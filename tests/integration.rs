//! Device-level scenarios for the envirostat block registry
//!
//! Drives the full NVM service over the mock flash medium: first boot,
//! settings change, power cycle, in-field corruption, factory reset.

use envirostat_nvm::nvm::registry::{
    BLOCK_CALIBRATION, BLOCK_SETTINGS, CALIBRATION_SIZE, DEVICE_BLOCKS, SETTINGS_SIZE,
};
use envirostat_nvm::nvm::{CommitOutcome, NvmError, NvmService};
use envirostat_nvm::platform::mock::MockFlash;
use envirostat_nvm::platform::StorageMedium;

fn boot(flash: MockFlash) -> NvmService<MockFlash> {
    let mut service = NvmService::new(flash, &DEVICE_BLOCKS, 0);
    service.init().unwrap();
    service
}

#[test]
fn first_boot_serves_factory_defaults_and_heals_medium() {
    let mut service = boot(MockFlash::new());

    // Blank medium: every block comes up as its factory default
    let mut settings = [0u8; SETTINGS_SIZE];
    service.read(BLOCK_SETTINGS, &mut settings).unwrap();
    let setpoint = i16::from_le_bytes([settings[0], settings[1]]);
    assert_eq!(setpoint, 2200); // 22.00 C

    // First commit persists the defaulted registry
    assert_eq!(service.commit(), Ok(CommitOutcome::Written));
    assert_eq!(service.commit(), Ok(CommitOutcome::NoChanges));
}

#[test]
fn settings_survive_a_power_cycle() {
    let mut service = boot(MockFlash::new());
    service.commit().unwrap();

    // Operator raises the temperature setpoint to 25.50 C
    let setpoint = 2550i16.to_le_bytes();
    service.write(BLOCK_SETTINGS, &setpoint).unwrap();
    service.deinit().unwrap();

    // Power cycle
    let mut service = boot(service.into_medium());

    let mut settings = [0u8; SETTINGS_SIZE];
    service.read(BLOCK_SETTINGS, &mut settings).unwrap();
    assert_eq!(i16::from_le_bytes([settings[0], settings[1]]), 2550);
    assert_eq!(service.is_dirty(BLOCK_SETTINGS), Some(false));
}

#[test]
fn corrupted_calibration_recovers_without_touching_settings() {
    let mut service = boot(MockFlash::new());
    let setpoint = 1850i16.to_le_bytes();
    service.write(BLOCK_SETTINGS, &setpoint).unwrap();
    service.commit().unwrap();

    // Corrupt the calibration record in place
    let mut flash = service.into_medium();
    let sector = flash.sector_size();
    flash.inject_corruption(BLOCK_CALIBRATION as u32 * sector, 8);

    let mut service = boot(flash);

    // Calibration fell back to identity defaults and is pending a rewrite
    let mut cal = [0u8; CALIBRATION_SIZE];
    service.read(BLOCK_CALIBRATION, &mut cal).unwrap();
    let scale = f32::from_le_bytes([cal[0], cal[1], cal[2], cal[3]]);
    assert_eq!(scale, 1.0);
    assert_eq!(service.is_dirty(BLOCK_CALIBRATION), Some(true));

    // Settings were untouched by the neighbor's corruption
    let mut settings = [0u8; SETTINGS_SIZE];
    service.read(BLOCK_SETTINGS, &mut settings).unwrap();
    assert_eq!(i16::from_le_bytes([settings[0], settings[1]]), 1850);
    assert_eq!(service.is_dirty(BLOCK_SETTINGS), Some(false));

    // Commit heals the corrupted record
    assert_eq!(service.commit(), Ok(CommitOutcome::Written));
    assert!(service.verify(BLOCK_CALIBRATION).is_ok());
}

#[test]
fn factory_reset_restores_defaults_everywhere() {
    let mut service = boot(MockFlash::new());
    let setpoint = 3000i16.to_le_bytes();
    service.write(BLOCK_SETTINGS, &setpoint).unwrap();
    service.commit().unwrap();

    service.format().unwrap();

    let mut settings = [0u8; SETTINGS_SIZE];
    service.read(BLOCK_SETTINGS, &mut settings).unwrap();
    assert_eq!(i16::from_le_bytes([settings[0], settings[1]]), 2200);

    // Reset is already persisted: a power cycle changes nothing
    let mut service = boot(service.into_medium());
    service.read(BLOCK_SETTINGS, &mut settings).unwrap();
    assert_eq!(i16::from_le_bytes([settings[0], settings[1]]), 2200);
    assert_eq!(service.commit(), Ok(CommitOutcome::NoChanges));
}

#[test]
fn commit_retries_after_transient_medium_faults() {
    let mut service = boot(MockFlash::new());
    service.commit().unwrap();

    let setpoint = 2400i16.to_le_bytes();
    service.write(BLOCK_SETTINGS, &setpoint).unwrap();

    service.medium_mut().set_fail_erases(true);
    assert_eq!(service.commit(), Err(NvmError::EraseError));

    // The change is still cached and dirty; the retry lands it
    service.medium_mut().set_fail_erases(false);
    assert_eq!(service.commit(), Ok(CommitOutcome::Written));

    let mut service = boot(service.into_medium());
    let mut settings = [0u8; SETTINGS_SIZE];
    service.read(BLOCK_SETTINGS, &mut settings).unwrap();
    assert_eq!(i16::from_le_bytes([settings[0], settings[1]]), 2400);
}
