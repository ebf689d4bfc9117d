use std::sync::atomic::{AtomicU64, Ordering};

use crate::sentiment::Sentiment;

/// Thread-safe counters describing pipeline activity.
#[derive(Default)]
pub struct PipelineMetrics {
    reviews_analyzed: AtomicU64,
    positive: AtomicU64,
    negative: AtomicU64,
    neutral: AtomicU64,
    summaries_generated: AtomicU64,
    summaries_passed_through: AtomicU64,
    summaries_failed: AtomicU64,
    topic_failures: AtomicU64,
}

impl PipelineMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed review and its sentiment label.
    pub fn record_review(&self, sentiment: Sentiment) {
        self.reviews_analyzed.fetch_add(1, Ordering::Relaxed);
        let counter = match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
            Sentiment::Neutral => &self.neutral,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a summary produced by the generation backend.
    pub fn record_summary_generated(&self) {
        self.summaries_generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a review too short to summarize.
    pub fn record_summary_passthrough(&self) {
        self.summaries_passed_through.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a summarization failure that was embedded in-band.
    pub fn record_summary_failure(&self) {
        self.summaries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a keyphrase ranking failure.
    pub fn record_topic_failure(&self) {
        self.topic_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reviews_analyzed: self.reviews_analyzed.load(Ordering::Relaxed),
            positive: self.positive.load(Ordering::Relaxed),
            negative: self.negative.load(Ordering::Relaxed),
            neutral: self.neutral.load(Ordering::Relaxed),
            summaries_generated: self.summaries_generated.load(Ordering::Relaxed),
            summaries_passed_through: self.summaries_passed_through.load(Ordering::Relaxed),
            summaries_failed: self.summaries_failed.load(Ordering::Relaxed),
            topic_failures: self.topic_failures.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of pipeline counters used for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Reviews that completed the pipeline since startup.
    pub reviews_analyzed: u64,
    /// Reviews labelled positive.
    pub positive: u64,
    /// Reviews labelled negative.
    pub negative: u64,
    /// Reviews labelled neutral.
    pub neutral: u64,
    /// Summaries produced by the generation backend.
    pub summaries_generated: u64,
    /// Reviews returned unchanged because they were too short.
    pub summaries_passed_through: u64,
    /// Summaries replaced by an `Error: ...` placeholder.
    pub summaries_failed: u64,
    /// Reviews whose topics degraded to empty after a ranking failure.
    pub topic_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_reviews_by_label() {
        let metrics = PipelineMetrics::new();
        metrics.record_review(Sentiment::Positive);
        metrics.record_review(Sentiment::Positive);
        metrics.record_review(Sentiment::Neutral);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.reviews_analyzed, 3);
        assert_eq!(snapshot.positive, 2);
        assert_eq!(snapshot.negative, 0);
        assert_eq!(snapshot.neutral, 1);
    }

    #[test]
    fn summary_and_topic_counters_are_independent() {
        let metrics = PipelineMetrics::new();
        metrics.record_summary_generated();
        metrics.record_summary_failure();
        metrics.record_summary_passthrough();
        metrics.record_topic_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.summaries_generated, 1);
        assert_eq!(snapshot.summaries_failed, 1);
        assert_eq!(snapshot.summaries_passed_through, 1);
        assert_eq!(snapshot.topic_failures, 1);
        assert_eq!(snapshot.reviews_analyzed, 0);
    }

    #[test]
    fn fresh_snapshot_is_zeroed() {
        assert_eq!(PipelineMetrics::new().snapshot(), MetricsSnapshot::default());
    }
}
