pub mod scripted;
pub mod simulated;

pub use scripted::{ScriptedTransport, TransportCall};
pub use simulated::SimulatedSensor;
