use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use super::ChannelMetrics;
use crate::hal::ChannelKind;

#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub channel: String,
    pub polls: u64,
    pub errors_count: u64,
    pub avg_latency_us: u64,
    pub last_update_interval_us: u64,
}

#[derive(Clone, Default)]
pub struct MetricsCollector {
    metrics: BTreeMap<ChannelKind, Arc<ChannelMetrics>>,
    rows_recorded: Arc<AtomicU64>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ChannelKind, metrics: Arc<ChannelMetrics>) {
        self.metrics.insert(kind, metrics);
    }

    pub fn record_row(&self) {
        self.rows_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rows_recorded(&self) -> u64 {
        self.rows_recorded.load(Ordering::Relaxed)
    }

    /// Per-channel counters in fixed channel order
    pub fn snapshot(&self) -> BTreeMap<ChannelKind, MetricsSnapshot> {
        self.metrics
            .iter()
            .map(|(&kind, metrics)| {
                (
                    kind,
                    MetricsSnapshot {
                        channel: metrics.channel().to_string(),
                        polls: metrics.polls(),
                        errors_count: metrics.errors_count(),
                        avg_latency_us: metrics.avg_latency_us(),
                        last_update_interval_us: metrics.last_update_interval_us(),
                    },
                )
            })
            .collect()
    }

    pub fn get_channel_metrics(&self, kind: ChannelKind) -> Option<Arc<ChannelMetrics>> {
        self.metrics.get(&kind).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let mut collector = MetricsCollector::new();
        let metrics = Arc::new(ChannelMetrics::new("ambient_light"));
        collector.register(ChannelKind::AmbientLight, metrics.clone());

        let view = collector.clone();
        collector.record_row();
        metrics.finish_poll(metrics.start_poll());

        assert_eq!(view.rows_recorded(), 1);
        assert_eq!(view.snapshot()[&ChannelKind::AmbientLight].polls, 1);
        assert!(view.get_channel_metrics(ChannelKind::GyroAccel).is_none());
    }

    #[test]
    fn test_snapshot_in_channel_order() {
        let mut collector = MetricsCollector::new();
        for kind in [ChannelKind::AmbientLight, ChannelKind::GyroAccel, ChannelKind::TempPressure] {
            collector.register(kind, Arc::new(ChannelMetrics::new(kind.name())));
        }

        let order: Vec<ChannelKind> = collector.snapshot().into_keys().collect();
        assert_eq!(order, ChannelKind::ALL.to_vec());
    }
}
