pub mod output;
pub mod sink;

pub use output::RecordingLog;
pub use sink::RecordingSink;
