pub mod error;
pub mod layout;
pub mod sample;

pub use error::{AcquisitionError, ConfigError, DecodeError, Result};
pub use layout::ColumnLayout;
pub use sample::{CompositeRow, PhysicalSample};
