//! Latency accumulation and reporting.

use std::time::Duration;

/// Per-operation latency samples for one workload on one backend.
#[derive(Debug, Default)]
pub struct LatencyReport {
    samples: Vec<Duration>,
}

impl LatencyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, sample: Duration) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    pub fn avg(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.total() / self.samples.len() as u32
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().min().copied().unwrap_or(Duration::ZERO)
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().max().copied().unwrap_or(Duration::ZERO)
    }

    /// Log the summary line for this workload.
    pub fn summarize(&self, backend: &str, workload: &str) {
        tracing::info!(
            backend,
            workload,
            operations = self.len(),
            total = ?self.total(),
            avg = ?self.avg(),
            min = ?self.min(),
            max = ?self.max(),
            "workload finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_all_zero() {
        let report = LatencyReport::new();
        assert!(report.is_empty());
        assert_eq!(report.total(), Duration::ZERO);
        assert_eq!(report.avg(), Duration::ZERO);
        assert_eq!(report.min(), Duration::ZERO);
        assert_eq!(report.max(), Duration::ZERO);
    }

    #[test]
    fn stats_over_samples() {
        let mut report = LatencyReport::new();
        report.record(Duration::from_millis(10));
        report.record(Duration::from_millis(20));
        report.record(Duration::from_millis(60));

        assert_eq!(report.len(), 3);
        assert_eq!(report.total(), Duration::from_millis(90));
        assert_eq!(report.avg(), Duration::from_millis(30));
        assert_eq!(report.min(), Duration::from_millis(10));
        assert_eq!(report.max(), Duration::from_millis(60));
    }
}
