use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};

use crate::engine::StopHandle;
use crate::hal::types::ChannelKind;
use crate::hal::Transport;

/// Transport call as observed by the scripted mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Read(String),
    WriteControl(String, Vec<u8>),
    ReadControl(String),
    Subscribe(String),
    Unsubscribe(String),
}

/// Plays back queued payloads and records every call
///
/// Reads fail once a channel's queue is empty. With `stop_when_drained`, the
/// handle fires as soon as the last queued payload has been handed out, so a
/// recording loop stops cleanly after consuming exactly the script.
#[derive(Default)]
pub struct ScriptedTransport {
    payloads: HashMap<String, VecDeque<Vec<u8>>>,
    controls: HashMap<String, Vec<u8>>,
    control_readback: Option<Vec<u8>>,
    failing_subscribe: bool,
    stop_when_drained: Option<StopHandle>,
    stop_on_control_write: Option<StopHandle>,
    calls: Vec<TransportCall>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ChannelKind, payload: impl Into<Vec<u8>>) -> &mut Self {
        self.payloads
            .entry(kind.data_uuid().to_string())
            .or_default()
            .push_back(payload.into());
        self
    }

    /// Make control reads return this value regardless of what was written
    pub fn override_control_readback(&mut self, value: Vec<u8>) -> &mut Self {
        self.control_readback = Some(value);
        self
    }

    /// Make every subscribe/unsubscribe fail
    pub fn fail_subscriptions(&mut self) -> &mut Self {
        self.failing_subscribe = true;
        self
    }

    pub fn stop_when_drained(&mut self, handle: StopHandle) -> &mut Self {
        self.stop_when_drained = Some(handle);
        self
    }

    /// Fire `handle` while the sample-interval write is in flight
    pub fn stop_on_control_write(&mut self, handle: StopHandle) -> &mut Self {
        self.stop_on_control_write = Some(handle);
        self
    }

    pub fn calls(&self) -> &[TransportCall] {
        &self.calls
    }

    pub fn remaining(&self) -> usize {
        self.payloads.values().map(|queue| queue.len()).sum()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn read_channel(&mut self, channel_id: &str) -> Result<Vec<u8>> {
        self.calls.push(TransportCall::Read(channel_id.to_string()));

        let payload = self
            .payloads
            .get_mut(channel_id)
            .and_then(|queue| queue.pop_front())
            .ok_or_else(|| anyhow!("No scripted payload left for {}", channel_id))?;

        if self.remaining() == 0 {
            if let Some(handle) = &self.stop_when_drained {
                handle.stop();
            }
        }
        Ok(payload)
    }

    async fn write_control(&mut self, control_id: &str, value: &[u8]) -> Result<()> {
        self.calls
            .push(TransportCall::WriteControl(control_id.to_string(), value.to_vec()));
        self.controls.insert(control_id.to_string(), value.to_vec());
        if let Some(handle) = &self.stop_on_control_write {
            handle.stop();
        }
        Ok(())
    }

    async fn read_control(&mut self, control_id: &str) -> Result<Vec<u8>> {
        self.calls.push(TransportCall::ReadControl(control_id.to_string()));
        if let Some(value) = &self.control_readback {
            return Ok(value.clone());
        }
        self.controls
            .get(control_id)
            .cloned()
            .ok_or_else(|| anyhow!("Control {} never written", control_id))
    }

    async fn subscribe(&mut self, channel_id: &str) -> Result<()> {
        self.calls.push(TransportCall::Subscribe(channel_id.to_string()));
        if self.failing_subscribe {
            return Err(anyhow!("Notifications unsupported for {}", channel_id));
        }
        Ok(())
    }

    async fn unsubscribe(&mut self, channel_id: &str) -> Result<()> {
        self.calls.push(TransportCall::Unsubscribe(channel_id.to_string()));
        if self.failing_subscribe {
            return Err(anyhow!("Notifications unsupported for {}", channel_id));
        }
        Ok(())
    }
}
