use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

use super::state::AcquisitionState;
use super::stop::StopHandle;
use crate::config::SessionConfig;
use crate::core::{AcquisitionError, ColumnLayout, Result};
use crate::hal::{
    ChannelKind, RawReading, SensorChannel, Transport, SAMPLE_INTERVAL_UUID, SAMPLE_INTERVAL_VALUE,
};
use crate::observability::{ChannelMetrics, MetricsCollector, SessionMonitor};
use crate::recording::{RecordingLog, RecordingSink};

/// AcquisitionSession drives one sensor module through enable -> record -> finalize
///
/// Polls run strictly one after another in fixed channel order. The row buffer
/// is owned here and only handed to the log writer once the loop has stopped.
pub struct AcquisitionSession<T: Transport> {
    transport: T,
    config: SessionConfig,

    /// One per kind, indexed by `ChannelKind::index`
    channels: Vec<SensorChannel>,

    /// Active channels for the current session, fixed at start
    layout: Option<ColumnLayout>,

    sink: Option<RecordingSink>,
    state: AcquisitionState,
    started_at: Option<Instant>,

    stop: StopHandle,
    stop_rx: watch::Receiver<bool>,

    channel_metrics: Vec<Arc<ChannelMetrics>>,
    metrics_collector: MetricsCollector,
}

impl<T: Transport> AcquisitionSession<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let channels = ChannelKind::ALL
            .into_iter()
            .map(|kind| SensorChannel::with_profile(kind, config.pressure_profile))
            .collect();
        let (stop, stop_rx) = StopHandle::new();

        Self {
            transport,
            config,
            channels,
            layout: None,
            sink: None,
            state: AcquisitionState::Idle,
            started_at: None,
            stop,
            stop_rx,
            channel_metrics: Vec::new(),
            metrics_collector: MetricsCollector::new(),
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the configuration; only allowed between sessions
    pub fn configure(&mut self, config: SessionConfig) -> Result<()> {
        if self.state != AcquisitionState::Idle {
            return Err(AcquisitionError::InvalidTransition {
                from: self.state.name(),
                to: "Idle",
            });
        }
        self.config = config;
        Ok(())
    }

    pub fn channel(&self, kind: ChannelKind) -> &SensorChannel {
        &self.channels[kind.index()]
    }

    pub fn layout(&self) -> Option<&ColumnLayout> {
        self.layout.as_ref()
    }

    /// Rows appended so far and not yet finalized
    pub fn buffered_rows(&self) -> usize {
        self.sink.as_ref().map_or(0, |sink| sink.len())
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn monitor(&self) -> SessionMonitor {
        SessionMonitor::new(self.metrics_collector.clone())
    }

    fn transition_to(&mut self, target: AcquisitionState) -> Result<()> {
        if !self.state.can_transition_to(&target) {
            return Err(AcquisitionError::InvalidTransition {
                from: self.state.name(),
                to: target.name(),
            });
        }
        log::debug!("Session {} -> {}", self.state.name(), target.name());
        self.state = target;
        Ok(())
    }

    pub async fn start(&mut self) -> Result<()> {
        self.start_at(Instant::now()).await
    }

    /// Enable the configured channels and begin buffering at `t0`
    pub async fn start_at(&mut self, t0: Instant) -> Result<()> {
        if self.state != AcquisitionState::Idle {
            return Err(AcquisitionError::InvalidTransition {
                from: self.state.name(),
                to: AcquisitionState::Recording.name(),
            });
        }

        // Cleared before the first await so a stop issued during setup sticks
        self.stop.reset();

        let layout = self.config.layout()?;
        self.write_sample_interval().await?;

        log::info!("Enabling sensors: {:?}", layout.channels());
        for channel in self.channels.iter_mut() {
            let kind = channel.kind();
            channel.set_profile(self.config.pressure_profile);

            if layout.contains(kind) {
                subscribe_best_effort(&mut self.transport, kind).await;
                channel.enable()?;
            } else if channel.is_enabled() {
                channel.disable()?;
                unsubscribe_best_effort(&mut self.transport, kind).await;
            }
        }

        self.channel_metrics = ChannelKind::ALL
            .into_iter()
            .map(|kind| Arc::new(ChannelMetrics::new(kind.name())))
            .collect();
        let mut collector = MetricsCollector::new();
        for &kind in layout.channels() {
            collector.register(kind, self.channel_metrics[kind.index()].clone());
        }
        self.metrics_collector = collector;

        self.sink = Some(RecordingSink::new(layout.clone()));
        self.layout = Some(layout);
        self.started_at = Some(t0);

        self.transition_to(AcquisitionState::Recording)
    }

    async fn write_sample_interval(&mut self) -> Result<()> {
        log::info!("Setting sample interval to {:02x?}", SAMPLE_INTERVAL_VALUE);
        self.transport
            .write_control(SAMPLE_INTERVAL_UUID, &SAMPLE_INTERVAL_VALUE)
            .await
            .map_err(AcquisitionError::Transport)?;

        if self.config.verify_control_write {
            let actual = self
                .transport
                .read_control(SAMPLE_INTERVAL_UUID)
                .await
                .map_err(AcquisitionError::Transport)?;

            if actual != SAMPLE_INTERVAL_VALUE {
                return Err(AcquisitionError::ControlMismatch {
                    expected: SAMPLE_INTERVAL_VALUE.to_vec(),
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Poll until the stop handle fires; returns the number of rows appended
    ///
    /// Any read or decode failure ends the recording: the session moves to
    /// `Finalizing` with the rows buffered so far and the error is returned.
    /// A row only reaches the buffer once every active channel has been
    /// polled, so dropping this future mid-iteration leaves no partial row.
    pub async fn record(&mut self) -> Result<usize> {
        if self.state != AcquisitionState::Recording {
            return Err(AcquisitionError::InvalidTransition {
                from: self.state.name(),
                to: AcquisitionState::Recording.name(),
            });
        }

        let (layout, t0) = match (self.layout.clone(), self.started_at) {
            (Some(layout), Some(t0)) => (layout, t0),
            _ => {
                return Err(AcquisitionError::InvalidTransition {
                    from: self.state.name(),
                    to: AcquisitionState::Recording.name(),
                })
            }
        };

        log::info!("Recording data");
        let mut appended = 0usize;

        loop {
            let stopped = *self.stop_rx.borrow();
            if stopped {
                break;
            }

            let values = match self.poll_row(&layout).await {
                Ok(values) => values,
                Err(e) => {
                    log::error!("Recording aborted after {} rows: {}", appended, e);
                    self.transition_to(AcquisitionState::Finalizing)?;
                    return Err(e);
                }
            };

            let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
            if let Some(sink) = self.sink.as_mut() {
                sink.append(elapsed_ms, values);
            }
            self.metrics_collector.record_row();
            appended += 1;

            tokio::task::yield_now().await;
        }

        log::info!("Recording stopped after {} rows", appended);
        self.transition_to(AcquisitionState::Finalizing)?;
        Ok(appended)
    }

    async fn poll_row(&mut self, layout: &ColumnLayout) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(layout.width());

        for &kind in layout.channels() {
            let metrics = self.channel_metrics[kind.index()].clone();
            let start = metrics.start_poll();

            let raw = match self.transport.read_channel(kind.data_uuid()).await {
                Ok(bytes) => RawReading::new(bytes),
                Err(e) => {
                    metrics.record_error();
                    return Err(AcquisitionError::Transport(e));
                }
            };

            let channel = &mut self.channels[kind.index()];
            let sample = match channel.poll(&raw) {
                Ok(sample) => sample,
                Err(e) => {
                    metrics.record_error();
                    return Err(e.into());
                }
            };

            metrics.finish_poll(start);
            if let Some(interval) = channel.last_update_interval() {
                metrics.record_update_interval(interval);
            }
            log::trace!("{} -> {:?}", kind, sample);

            sample.extend_into(&mut values);
        }

        Ok(values)
    }

    /// Write the log to `writer`, then disable every channel
    pub async fn finalize<W: Write>(&mut self, writer: W) -> Result<RecordingLog> {
        let log = self.drain()?;
        let written = log.write_to(writer);
        self.teardown().await?;
        written?;
        Ok(log)
    }

    /// Write the log to a file, then disable every channel
    pub async fn finalize_to_path(&mut self, path: impl AsRef<Path>) -> Result<RecordingLog> {
        let log = self.drain()?;
        let written = log.save(path).await;
        self.teardown().await?;
        written?;
        Ok(log)
    }

    /// Complete session: start, record until stopped, finalize to `path`
    ///
    /// Finalizes even when recording fails; the recording error wins.
    pub async fn run(&mut self, path: impl AsRef<Path>) -> Result<RecordingLog> {
        self.start().await?;
        let recorded = self.record().await;
        let finalized = self.finalize_to_path(path).await;

        match (recorded, finalized) {
            (Err(e), Err(finalize_err)) => {
                log::error!("Finalize after failed recording also failed: {}", finalize_err);
                Err(e)
            }
            (Err(e), Ok(_)) => Err(e),
            (Ok(_), finalized) => finalized,
        }
    }

    fn drain(&mut self) -> Result<RecordingLog> {
        match self.state {
            AcquisitionState::Recording => self.transition_to(AcquisitionState::Finalizing)?,
            AcquisitionState::Finalizing => {}
            AcquisitionState::Idle => {
                return Err(AcquisitionError::InvalidTransition {
                    from: self.state.name(),
                    to: AcquisitionState::Finalizing.name(),
                })
            }
        }

        match self.sink.take() {
            Some(sink) => Ok(sink.finalize()),
            None => Err(AcquisitionError::InvalidTransition {
                from: self.state.name(),
                to: AcquisitionState::Idle.name(),
            }),
        }
    }

    async fn teardown(&mut self) -> Result<()> {
        for channel in self.channels.iter_mut() {
            if channel.is_enabled() {
                channel.disable()?;
                unsubscribe_best_effort(&mut self.transport, channel.kind()).await;
            }
        }

        self.started_at = None;
        self.transition_to(AcquisitionState::Idle)
    }
}

async fn subscribe_best_effort<T: Transport>(transport: &mut T, kind: ChannelKind) {
    if let Err(e) = transport.subscribe(kind.data_uuid()).await {
        log::warn!("Failed to subscribe to {}: {:#}", kind, e);
    }
}

async fn unsubscribe_best_effort<T: Transport>(transport: &mut T, kind: ChannelKind) {
    if let Err(e) = transport.unsubscribe(kind.data_uuid()).await {
        log::warn!("Failed to unsubscribe from {}: {:#}", kind, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::mock::ScriptedTransport;

    #[test]
    fn test_new_session_is_idle() {
        let config = SessionConfig::with_channels([ChannelKind::GyroAccel]);
        let session = AcquisitionSession::new(ScriptedTransport::new(), config);

        assert_eq!(session.state(), AcquisitionState::Idle);
        assert_eq!(session.buffered_rows(), 0);
        assert!(session.layout().is_none());
        for kind in ChannelKind::ALL {
            assert!(!session.channel(kind).is_enabled());
        }
    }

    #[tokio::test]
    async fn test_record_requires_start() {
        let config = SessionConfig::with_channels([ChannelKind::GyroAccel]);
        let mut session = AcquisitionSession::new(ScriptedTransport::new(), config);

        let err = session.record().await.unwrap_err();
        assert!(matches!(err, AcquisitionError::InvalidTransition { from: "Idle", .. }));

        let err = session.finalize(Vec::new()).await.unwrap_err();
        assert!(matches!(err, AcquisitionError::InvalidTransition { .. }));
    }
}
