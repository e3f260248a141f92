use anyhow::Result;
use async_trait::async_trait;

/// Characteristic-oriented link to the sensor module
///
/// Implemented by the radio stack adapter (or a mock). The acquisition core
/// never retries or times out these calls; that policy lives here.
#[async_trait]
pub trait Transport: Send {
    /// Read the current value of a data characteristic
    async fn read_channel(&mut self, channel_id: &str) -> Result<Vec<u8>>;

    /// Write raw bytes to a configuration characteristic
    async fn write_control(&mut self, control_id: &str, value: &[u8]) -> Result<()>;

    /// Read a configuration characteristic back
    async fn read_control(&mut self, control_id: &str) -> Result<Vec<u8>>;

    /// Start notifications for a data characteristic (best effort)
    async fn subscribe(&mut self, _channel_id: &str) -> Result<()> {
        Ok(())
    }

    /// Stop notifications for a data characteristic (best effort)
    async fn unsubscribe(&mut self, _channel_id: &str) -> Result<()> {
        Ok(())
    }
}
