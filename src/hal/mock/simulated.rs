use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::time::{sleep, Duration, Instant};

use crate::hal::types::{ChannelKind, PressureProfile};
use crate::hal::Transport;

/// Synthetic sensor module
///
/// Accel reads 1 g on Z, gyro X follows a slow sine, temperature sits near
/// 20.5 degC and the light level ramps.
pub struct SimulatedSensor {
    read_delay: Option<Duration>,
    profile: PressureProfile,
    controls: HashMap<String, Vec<u8>>,
    subscribed: HashSet<String>,
    start_time: Instant,
    reads: u64,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        Self {
            read_delay: None,
            profile: PressureProfile::Unsigned,
            controls: HashMap::new(),
            subscribed: HashSet::new(),
            start_time: Instant::now(),
            reads: 0,
        }
    }

    /// Sleep before each gyro/accel read, e.g. 10 ms for a 100 Hz device
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn with_profile(mut self, profile: PressureProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn is_subscribed(&self, channel_id: &str) -> bool {
        self.subscribed.contains(channel_id)
    }

    pub fn control_value(&self, control_id: &str) -> Option<&[u8]> {
        self.controls.get(control_id).map(|v| v.as_slice())
    }

    fn gyro_accel_payload(&self) -> Vec<u8> {
        let t = self.start_time.elapsed().as_secs_f64();
        let gyro_x = ((2.0 * std::f64::consts::PI * 0.5 * t).sin() * 8000.0) as i16;
        let accel: [i16; 3] = [0, 0, 16384];
        let gyro: [i16; 3] = [gyro_x, 0, 0];

        accel
            .iter()
            .chain(gyro.iter())
            .flat_map(|v| v.to_be_bytes())
            .collect()
    }

    fn temp_pressure_payload(&self) -> Vec<u8> {
        let temp_counts = (20.5 * 5120.0) as i32;
        let mut bytes = Vec::with_capacity(8);

        match self.profile {
            PressureProfile::Unsigned => {
                bytes.push(0);
                bytes.extend_from_slice(&temp_counts.to_be_bytes()[1..4]);
                bytes.extend_from_slice(&(101_325u32 + (self.reads % 7) as u32).to_be_bytes());
            }
            PressureProfile::Signed => {
                bytes.extend_from_slice(&temp_counts.to_be_bytes());
                bytes.extend_from_slice(&10_132_500i32.to_be_bytes());
            }
        }
        bytes
    }

    fn ambient_light_payload(&self) -> Vec<u8> {
        (1000 + (self.reads % 1000) as u16).to_be_bytes().to_vec()
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for SimulatedSensor {
    async fn read_channel(&mut self, channel_id: &str) -> Result<Vec<u8>> {
        let kind = ChannelKind::ALL
            .into_iter()
            .find(|kind| kind.data_uuid() == channel_id)
            .ok_or_else(|| anyhow!("Unknown characteristic: {}", channel_id))?;

        if kind == ChannelKind::GyroAccel {
            if let Some(delay) = self.read_delay {
                sleep(delay).await;
            }
        }

        let payload = match kind {
            ChannelKind::GyroAccel => self.gyro_accel_payload(),
            ChannelKind::TempPressure => self.temp_pressure_payload(),
            ChannelKind::AmbientLight => self.ambient_light_payload(),
        };
        self.reads += 1;
        Ok(payload)
    }

    async fn write_control(&mut self, control_id: &str, value: &[u8]) -> Result<()> {
        self.controls.insert(control_id.to_string(), value.to_vec());
        Ok(())
    }

    async fn read_control(&mut self, control_id: &str) -> Result<Vec<u8>> {
        self.controls
            .get(control_id)
            .cloned()
            .ok_or_else(|| anyhow!("Control {} never written", control_id))
    }

    async fn subscribe(&mut self, channel_id: &str) -> Result<()> {
        self.subscribed.insert(channel_id.to_string());
        Ok(())
    }

    async fn unsubscribe(&mut self, channel_id: &str) -> Result<()> {
        self.subscribed.remove(channel_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::decoder::decode_channel;
    use crate::core::PhysicalSample;

    #[tokio::test]
    async fn test_payloads_decode() {
        let mut sensor = SimulatedSensor::new();

        for kind in ChannelKind::ALL {
            let bytes = sensor.read_channel(kind.data_uuid()).await.unwrap();
            let sample = decode_channel(kind, &bytes, PressureProfile::Unsigned).unwrap();
            assert_eq!(sample.kind(), kind);
        }

        let bytes = sensor.read_channel(ChannelKind::GyroAccel.data_uuid()).await.unwrap();
        match decode_channel(ChannelKind::GyroAccel, &bytes, PressureProfile::Unsigned).unwrap() {
            PhysicalSample::GyroAccel { accel, .. } => assert_eq!(accel[2], 1.0),
            other => panic!("unexpected sample {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signed_profile_payload() {
        let mut sensor = SimulatedSensor::new().with_profile(PressureProfile::Signed);
        let bytes = sensor
            .read_channel(ChannelKind::TempPressure.data_uuid())
            .await
            .unwrap();

        match decode_channel(ChannelKind::TempPressure, &bytes, PressureProfile::Signed).unwrap() {
            PhysicalSample::TempPressure { temperature, pressure } => {
                assert!((temperature - 20.5).abs() < 1e-3);
                assert!((pressure - 101_325.0).abs() < 1e-6);
            }
            other => panic!("unexpected sample {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_control_readback_and_unknown_uuid() {
        let mut sensor = SimulatedSensor::new();
        assert!(sensor.read_control("ctrl").await.is_err());

        sensor.write_control("ctrl", &[0x00, 0x64]).await.unwrap();
        assert_eq!(sensor.read_control("ctrl").await.unwrap(), vec![0x00, 0x64]);

        assert!(sensor.read_channel("not-a-uuid").await.is_err());
    }
}
