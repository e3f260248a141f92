use super::MetricsCollector;

pub struct SessionMonitor {
    collector: MetricsCollector,
}

impl SessionMonitor {
    pub fn new(collector: MetricsCollector) -> Self {
        Self { collector }
    }

    pub fn generate_report(&self) -> String {
        let snapshot = self.collector.snapshot();

        if snapshot.is_empty() {
            return "No channels registered".to_string();
        }

        let mut report = format!(
            "=== Session Metrics ===\nRows recorded: {}\n",
            self.collector.rows_recorded()
        );

        for metrics in snapshot.values() {
            let interval = if metrics.last_update_interval_us > 0 {
                format!("{:.2} ms", metrics.last_update_interval_us as f64 / 1000.0)
            } else {
                "n/a".to_string()
            };

            report.push_str(&format!(
                "\n[{}]\n  Polls: {}\n  Errors: {}\n  Avg Latency: {}μs\n  Update Interval: {}\n",
                metrics.channel, metrics.polls, metrics.errors_count, metrics.avg_latency_us, interval
            ));
        }

        report
    }

    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }
}
