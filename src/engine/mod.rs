pub mod session;
pub mod state;
pub mod stop;

pub use session::AcquisitionSession;
pub use state::AcquisitionState;
pub use stop::StopHandle;
