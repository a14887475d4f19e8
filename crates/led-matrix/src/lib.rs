//! Driver for the Troyka LED matrix module (IS31FL3728 controller).
//!
//! The controller drives up to 8 columns × 11 rows of LEDs and is configured
//! through a handful of 8-bit registers over I²C. This crate keeps a copy of
//! the pixel grid and of the control registers, and turns pixel edits and
//! configuration changes into the register writes the chip expects.
//!
//! # Layers
//!
//! ```text
//! Application (demo loop, firmware task)
//!         ↓
//! LedMatrix<I>        driver: caching, sequencing        (driver)
//!         ↓
//! Config / FrameBuffer pure register packing & pixels     (config, frame)
//!         ↓
//! embedded_hal::i2c::I2c  transport supplied by the caller
//! ```
//!
//! # Features
//!
//! - `std`: export the [`mocks`] transport for downstream tests
//! - `defmt`: `defmt::Format` on public types and defmt log output
//! - `tracing`: log output through `tracing` (host builds)
//!
//! # Example
//!
//! ```
//! use led_matrix::{LedMatrix, MatrixSize, Update, DEFAULT_ADDRESS};
//! # use led_matrix::mocks::RecordingI2c;
//! # fn main() -> Result<(), led_matrix::Error<led_matrix::mocks::MockBusError>> {
//! # let i2c = RecordingI2c::new();
//! let mut matrix = LedMatrix::new(i2c, DEFAULT_ADDRESS, MatrixSize::Size8x8)?;
//! matrix.set_current_limit(4)?;
//! matrix.draw_pixel(1, 1, Update::Deferred)?;
//! matrix.draw_pixel(2, 2, Update::Deferred)?;
//! matrix.update_display()?;
//! # Ok(())
//! # }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)] // all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register names and hex offsets in doc comments
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects))]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

/// Debug-level log through whichever backend is enabled.
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::debug!($($arg)*);
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    }};
}

/// Trace-level log through whichever backend is enabled.
macro_rules! log_trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "defmt")]
        defmt::trace!($($arg)*);
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    }};
}

pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod mocks;
pub mod registers;

pub use config::{AudioGain, Config, CurrentLimit, MatrixSize};
pub use driver::{LedMatrix, Update};
pub use error::Error;
pub use frame::{FrameBuffer, MAX_COLS, MAX_ROWS, MIN_COLS, MIN_ROWS};
pub use registers::DEFAULT_ADDRESS;
