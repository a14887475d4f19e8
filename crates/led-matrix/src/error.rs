//! Driver error type.

use thiserror::Error;

/// Errors returned by [`LedMatrix`](crate::LedMatrix) operations.
///
/// `E` is the error type of the I²C transport. The driver never validates
/// arguments (out-of-range values are masked to the register width), so the
/// only failure is a rejected bus write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error<E> {
    /// The I²C write failed (NACK, arbitration loss, bus fault, ...).
    #[error("i2c transport error: {0:?}")]
    Transport(E),
}

impl<E> Error<E> {
    /// The underlying transport error.
    pub fn transport(&self) -> &E {
        match self {
            Self::Transport(inner) => inner,
        }
    }

    /// Consume the error, returning the transport error.
    pub fn into_transport(self) -> E {
        match self {
            Self::Transport(inner) => inner,
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Transport(_) => defmt::write!(f, "i2c transport error"),
        }
    }
}

impl<E: embedded_hal::i2c::Error> Error<E> {
    /// Classify the transport failure with the generic embedded-hal taxonomy.
    pub fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        self.transport().kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Nack;

    impl embedded_hal::i2c::Error for Nack {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        }
    }

    #[test]
    fn transport_error_is_kept_verbatim() {
        let err = Error::Transport(Nack);
        assert_eq!(err.transport(), &Nack);
        assert_eq!(err.into_transport(), Nack);
    }

    #[test]
    fn kind_comes_from_transport() {
        let err = Error::Transport(Nack);
        assert_eq!(
            err.kind(),
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        );
    }

    #[test]
    fn display_mentions_transport() {
        let text = std::format!("{}", Error::Transport(Nack));
        assert_eq!(text, "i2c transport error: Nack");
    }
}
