use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Per-channel poll counters
pub struct ChannelMetrics {
    channel: String,
    polls: AtomicU64,
    errors_count: AtomicU64,
    total_latency_us: AtomicU64,
    latency_samples: AtomicU64,
    last_update_interval_us: AtomicU64,
}

impl ChannelMetrics {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            polls: AtomicU64::new(0),
            errors_count: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            latency_samples: AtomicU64::new(0),
            last_update_interval_us: AtomicU64::new(0),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn polls(&self) -> u64 {
        self.polls.load(Ordering::Relaxed)
    }

    pub fn errors_count(&self) -> u64 {
        self.errors_count.load(Ordering::Relaxed)
    }

    pub fn record_error(&self) {
        self.errors_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn start_poll(&self) -> Instant {
        Instant::now()
    }

    /// Read + decode finished successfully
    pub fn finish_poll(&self, start: Instant) {
        let latency_us = start.elapsed().as_micros() as u64;
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_samples.fetch_add(1, Ordering::Relaxed);
        self.polls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_latency_us(&self) -> u64 {
        let samples = self.latency_samples.load(Ordering::Relaxed);
        if samples == 0 {
            return 0;
        }
        self.total_latency_us.load(Ordering::Relaxed) / samples
    }

    pub fn record_update_interval(&self, interval: Duration) {
        self.last_update_interval_us
            .store(interval.as_micros() as u64, Ordering::Relaxed);
    }

    /// 0 until the device has produced two distinct payloads
    pub fn last_update_interval_us(&self) -> u64 {
        self.last_update_interval_us.load(Ordering::Relaxed)
    }
}
