pub mod channel;
pub mod decoder;
pub mod mock;
pub mod traits;
pub mod types;

pub use channel::{ChannelState, SensorChannel};
pub use traits::Transport;
pub use types::{
    ChannelKind, PressureProfile, RawReading, SAMPLE_INTERVAL_UUID, SAMPLE_INTERVAL_VALUE,
};
