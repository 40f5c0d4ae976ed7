use thiserror::Error;

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    #[error(
        "capacity exceeded: data needs {required} bits but only {capacity} fit, {} bits over",
        .required - .capacity
    )]
    CapacityExceeded { required: usize, capacity: usize },

    #[error("unsupported character {byte:#04x} at index {index} for {mode:?} mode")]
    UnsupportedCharacter { mode: Mode, index: usize, byte: u8 },

    #[error("invalid error correction level")]
    InvalidECLevel,

    #[error("invalid version {0}, expected 1 to 40")]
    InvalidVersion(usize),

    #[error("invalid version range: minimum {min} is above maximum {max}")]
    InvalidVersionRange { min: usize, max: usize },

    #[error("invalid masking pattern {0}, expected 0 to 7")]
    InvalidMaskPattern(u8),

    #[error("internal consistency failure: {0}")]
    Internal(&'static str),
}

pub type QRResult<T> = Result<T, QRError>;

#[cfg(test)]
mod error_tests {
    use super::QRError;
    use crate::common::codec::Mode;

    #[test]
    fn test_capacity_exceeded_names_overflow() {
        let err = QRError::CapacityExceeded { required: 23656, capacity: 23648 };
        assert_eq!(
            err.to_string(),
            "capacity exceeded: data needs 23656 bits but only 23648 fit, 8 bits over"
        );
    }

    #[test]
    fn test_unsupported_character() {
        let err = QRError::UnsupportedCharacter { mode: Mode::Numeric, index: 3, byte: b'a' };
        assert_eq!(err.to_string(), "unsupported character 0x61 at index 3 for Numeric mode");
    }
}
