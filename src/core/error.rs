use thiserror::Error;

use crate::hal::ChannelKind;

/// Raw payload could not be turned into a physical sample
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{kind} payload must be {expected} bytes, got {actual}")]
    LengthMismatch {
        kind: ChannelKind,
        expected: usize,
        actual: usize,
    },

    #[error("{actual} bytes is not a whole number of 2-byte counts")]
    Misaligned { actual: usize },

    #[error("{kind} channel polled while disabled")]
    InvalidState { kind: ChannelKind },
}

/// Session configuration rejected before anything touches the device
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("at least one sensor channel must be enabled")]
    NoChannelEnabled,

    #[error("invalid session configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("recording log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Opaque failure reported by the transport collaborator
    #[error("transport failure: {0:#}")]
    Transport(#[source] anyhow::Error),

    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("control write not applied: wrote {expected:02x?}, read back {actual:02x?}")]
    ControlMismatch { expected: Vec<u8>, actual: Vec<u8> },
}

pub type Result<T, E = AcquisitionError> = std::result::Result<T, E>;
