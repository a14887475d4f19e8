//! Bus ownership tests — the driver borrows the transport, it does not own it.
//!
//! Two matrices at different addresses share one I²C bus through
//! `embedded_hal_bus::i2c::RefCellDevice`, and a third borrows a bus with
//! `&mut` and hands it back on drop.

// Test files legitimately use arithmetic and unwrap for verification; allow at file level.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::unwrap_used)]

use core::cell::RefCell;

use embedded_hal_bus::i2c::RefCellDevice;
use led_matrix::mocks::RecordingI2c;
use led_matrix::registers::REG_UPDATE;
use led_matrix::{LedMatrix, MatrixSize, Update};

#[test]
fn two_matrices_share_one_bus() {
    let bus = RefCell::new(RecordingI2c::new());

    let mut left = LedMatrix::new(RefCellDevice::new(&bus), 0x60, MatrixSize::Size8x8).unwrap();
    let mut right = LedMatrix::new(RefCellDevice::new(&bus), 0x61, MatrixSize::Size5x11).unwrap();

    left.draw_pixel(0, 0, Update::Immediate).unwrap();
    right.draw_pixel(4, 10, Update::Immediate).unwrap();

    drop(left);
    drop(right);
    let bus = bus.into_inner();
    let at = |address: u8| bus.writes().iter().filter(|w| w.address == address).count();
    // init (2) + 8 rows + commit
    assert_eq!(at(0x60), 2 + 8 + 1);
    // init (2) + 11 rows + commit
    assert_eq!(at(0x61), 2 + 11 + 1);
}

#[test]
fn borrowed_bus_is_usable_after_driver_drops() {
    let mut bus = RecordingI2c::new();
    {
        let mut matrix = LedMatrix::with_defaults(&mut bus).unwrap();
        matrix.clear(Update::Immediate).unwrap();
    }
    assert_eq!(bus.last_value(REG_UPDATE), Some(0xFF));
    bus.clear();
    assert!(bus.writes().is_empty());
}

#[test]
fn release_returns_transport_state() {
    let matrix = LedMatrix::with_defaults(RecordingI2c::new()).unwrap();
    let bus = matrix.release();
    assert_eq!(bus.writes().len(), 2);
}
