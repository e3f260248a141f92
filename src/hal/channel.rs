use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::decoder;
use super::types::{ChannelKind, PressureProfile, RawReading};
use crate::core::{DecodeError, PhysicalSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelState {
    #[default]
    Disabled,
    Enabled,
}

/// One physical sensor: enable gate plus raw-to-physical pipeline
///
/// Holds no transport handle. Whoever drives the channel subscribes before
/// `enable` and unsubscribes after `disable`.
#[derive(Debug, Clone)]
pub struct SensorChannel {
    kind: ChannelKind,
    profile: PressureProfile,
    state: ChannelState,
    last_sample: Option<PhysicalSample>,
    last_payload: Option<RawReading>,
    last_change: Option<Instant>,
    last_update_interval: Option<Duration>,
}

impl SensorChannel {
    pub fn new(kind: ChannelKind) -> Self {
        Self::with_profile(kind, PressureProfile::default())
    }

    pub fn with_profile(kind: ChannelKind, profile: PressureProfile) -> Self {
        Self {
            kind,
            profile,
            state: ChannelState::Disabled,
            last_sample: None,
            last_payload: None,
            last_change: None,
            last_update_interval: None,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn profile(&self) -> PressureProfile {
        self.profile
    }

    /// Only meaningful for temperature/pressure
    pub fn set_profile(&mut self, profile: PressureProfile) {
        self.profile = profile;
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state == ChannelState::Enabled
    }

    /// Idempotent; keeps the last-value cache
    pub fn enable(&mut self) -> Result<(), DecodeError> {
        if self.state != ChannelState::Enabled {
            log::debug!("{} channel enabled", self.kind);
            self.state = ChannelState::Enabled;
        }
        Ok(())
    }

    /// Idempotent; always succeeds locally
    pub fn disable(&mut self) -> Result<(), DecodeError> {
        if self.state != ChannelState::Disabled {
            log::debug!("{} channel disabled", self.kind);
            self.state = ChannelState::Disabled;
        }
        Ok(())
    }

    /// Decode a freshly read payload
    pub fn poll(&mut self, raw: &RawReading) -> Result<PhysicalSample, DecodeError> {
        if self.state != ChannelState::Enabled {
            return Err(DecodeError::InvalidState { kind: self.kind });
        }

        let sample = decoder::decode_channel(self.kind, raw.as_bytes(), self.profile)?;
        self.track_update(raw);
        self.last_sample = Some(sample);
        Ok(sample)
    }

    /// Measure how often the device actually refreshes the characteristic
    fn track_update(&mut self, raw: &RawReading) {
        if self.last_payload.as_ref() == Some(raw) {
            return;
        }

        let now = Instant::now();
        if let Some(previous) = self.last_change {
            let interval = now.duration_since(previous);
            log::trace!(
                "{} new payload after {:.2} ms",
                self.kind,
                interval.as_secs_f64() * 1000.0
            );
            self.last_update_interval = Some(interval);
        }
        self.last_change = Some(now);
        self.last_payload = Some(raw.clone());
    }

    pub fn last_sample(&self) -> Option<&PhysicalSample> {
        self.last_sample.as_ref()
    }

    /// Time between the two most recent distinct payloads
    pub fn last_update_interval(&self) -> Option<Duration> {
        self.last_update_interval
    }
}
