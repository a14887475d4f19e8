//! Mock I²C transport for testing
//!
//! [`RecordingI2c`] accepts every register write, records it, and can be
//! primed to fail a specific write so error propagation can be exercised.

#![cfg(any(test, feature = "std"))]

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use std::vec::Vec;

/// One recorded register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrite {
    /// 7-bit device address.
    pub address: u8,
    /// Register offset (first payload byte).
    pub register: u8,
    /// Register value (second payload byte).
    pub value: u8,
}

/// Error produced by [`RecordingI2c`] when a failure is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

impl embedded_hal::i2c::Error for MockBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
    }
}

/// Recording I²C bus.
///
/// Only plain two-byte writes are expected from the driver; any other
/// operation shape is recorded as a malformed transaction and surfaces in
/// [`RecordingI2c::malformed`].
#[derive(Debug, Default)]
pub struct RecordingI2c {
    writes: Vec<RegisterWrite>,
    malformed: usize,
    attempts: usize,
    fail_on: Option<usize>,
}

impl RecordingI2c {
    /// Create an empty, always-succeeding bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the write with zero-based index `attempt` (counting every write
    /// attempted on this bus, including failed ones).
    #[must_use]
    pub fn failing_at(mut self, attempt: usize) -> Self {
        self.fail_on = Some(attempt);
        self
    }

    /// Every successful register write, in order.
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes
    }

    /// Register offsets of every successful write, in order.
    pub fn registers_written(&self) -> Vec<u8> {
        self.writes.iter().map(|w| w.register).collect()
    }

    /// Most recent value written to `register`.
    pub fn last_value(&self, register: u8) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.register == register)
            .map(|w| w.value)
    }

    /// Number of transactions that were not a single two-byte write.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Forget recorded writes, keeping any injected failure.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl ErrorType for RecordingI2c {
    type Error = MockBusError;
}

impl I2c for RecordingI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let attempt = self.attempts;
        self.attempts = self.attempts.saturating_add(1);
        if self.fail_on == Some(attempt) {
            return Err(MockBusError);
        }
        match operations {
            [Operation::Write([register, value])] => {
                self.writes.push(RegisterWrite {
                    address,
                    register: *register,
                    value: *value,
                });
            }
            _ => self.malformed = self.malformed.saturating_add(1),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_register_writes() {
        let mut bus = RecordingI2c::new();
        bus.write(0x60, &[0x0D, 0x12]).unwrap();
        bus.write(0x60, &[0x00, 0x03]).unwrap();
        assert_eq!(bus.registers_written(), [0x0D, 0x00]);
        assert_eq!(bus.last_value(0x0D), Some(0x12));
        assert_eq!(bus.writes()[1].address, 0x60);
        assert_eq!(bus.malformed(), 0);
    }

    #[test]
    fn injected_failure_hits_one_attempt() {
        let mut bus = RecordingI2c::new().failing_at(1);
        assert!(bus.write(0x60, &[0x00, 0x00]).is_ok());
        assert_eq!(bus.write(0x60, &[0x01, 0x00]), Err(MockBusError));
        assert!(bus.write(0x60, &[0x02, 0x00]).is_ok());
        assert_eq!(bus.registers_written(), [0x00, 0x02]);
    }

    #[test]
    fn counts_non_register_transactions() {
        let mut bus = RecordingI2c::new();
        bus.write(0x60, &[0x01, 0x02, 0x03]).unwrap();
        let mut buf = [0u8; 1];
        bus.read(0x60, &mut buf).unwrap();
        assert_eq!(bus.malformed(), 2);
        assert!(bus.writes().is_empty());
    }
}
