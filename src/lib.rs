pub mod config;
pub mod core;
pub mod engine;
pub mod hal;
pub mod observability;
pub mod recording;

pub use config::SessionConfig;
pub use crate::core::{AcquisitionError, ConfigError, DecodeError};
pub use engine::{AcquisitionSession, AcquisitionState, StopHandle};
