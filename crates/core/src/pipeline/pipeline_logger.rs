use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Decouples the stream use case from specific output mechanisms so each
/// caller can observe pipeline behaviour without changing the orchestration
/// code.
pub trait PipelineLogger: Send {
    /// Report frame-level progress. `total` is 0 when the source does not
    /// report a frame count.
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named pipeline stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. persons per frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-stream summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Aggregating logger that tracks per-stage timing and metrics and writes
/// a summary through the `log` facade when the stream ends.
///
/// Progress output is throttled to every `throttle_frames` frames.
pub struct SummaryPipelineLogger {
    label: String,
    throttle_frames: usize,
    timings: HashMap<String, Vec<f64>>,
    metrics: HashMap<String, Vec<f64>>,
    start_time: Instant,
    frames: usize,
    messages: Vec<String>,
}

impl SummaryPipelineLogger {
    pub fn new(label: impl Into<String>, throttle_frames: usize) -> Self {
        Self {
            label: label.into(),
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            start_time: Instant::now(),
            frames: 0,
            messages: Vec::new(),
        }
    }

    /// Returns the formatted summary string, or `None` if no data recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let frames = self.frames;
        let mut lines = Vec::new();

        lines.push(format!(
            "Stream {} summary ({frames} frames, {:.1}s total):",
            self.label,
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        let mut metric_names: Vec<_> = self.metrics.keys().collect();
        metric_names.sort();
        for name in metric_names {
            let values = &self.metrics[name];
            let avg = if values.is_empty() {
                0.0
            } else {
                values.iter().sum::<f64>() / values.len() as f64
            };
            let max = values.iter().copied().fold(0.0, f64::max);
            lines.push(format!("  {name}: avg {avg:.1}  max {max:.0}"));
        }

        if frames > 0 && elapsed_ms > 0.0 {
            let fps = frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    /// Returns the timing data for a given stage.
    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    /// Returns the metric data for a given name.
    pub fn metrics_for(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|v| v.as_slice())
    }
}

impl PipelineLogger for SummaryPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames = current;
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::debug!("[{}] {current}/{total} frames ({pct:.1}%)", self.label);
        } else {
            log::debug!("[{}] {current} frames", self.label);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .push(value);
    }

    fn info(&mut self, message: &str) {
        self.messages.push(message.to_string());
        log::info!("[{}] {message}", self.label);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- NullPipelineLogger tests ---

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let mut logger = NullPipelineLogger;
        logger.progress(1, 10);
        logger.timing("detect", 5.0);
        logger.metric("persons", 3.0);
        logger.info("hello");
        logger.summary();
    }

    // --- SummaryPipelineLogger tests ---

    #[test]
    fn test_timing_records_values() {
        let mut logger = SummaryPipelineLogger::new("s", 10);
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("encode", 5.0);

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(detect.len(), 2);
        assert!((detect[0] - 20.0).abs() < f64::EPSILON);
        assert!((detect[1] - 30.0).abs() < f64::EPSILON);

        let encode = logger.timings_for("encode").unwrap();
        assert_eq!(encode.len(), 1);
    }

    #[test]
    fn test_metric_records_values() {
        let mut logger = SummaryPipelineLogger::new("s", 10);
        logger.metric("persons", 3.0);
        logger.metric("persons", 4.0);

        let values = logger.metrics_for("persons").unwrap();
        assert_eq!(values.len(), 2);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        assert!((avg - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_includes_stages_and_label() {
        let mut logger = SummaryPipelineLogger::new("abc", 10);
        logger.progress(10, 0);
        logger.timing("detect", 20.0);
        logger.timing("pose", 5.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("detect"));
        assert!(summary.contains("pose"));
        assert!(summary.contains("Stream abc summary (10 frames"));
    }

    #[test]
    fn test_summary_includes_metric_average_and_max() {
        let mut logger = SummaryPipelineLogger::new("s", 10);
        logger.progress(5, 5);
        logger.metric("persons", 3.0);
        logger.metric("persons", 4.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("persons: avg 3.5  max 4"));
    }

    #[test]
    fn test_summary_includes_fps() {
        let mut logger = SummaryPipelineLogger::new("s", 10);
        logger.progress(100, 100);
        logger.timing("detect", 10.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("fps"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        let logger = SummaryPipelineLogger::new("s", 10);
        assert!(logger.summary_string().is_none());
    }

    #[test]
    fn test_progress_tracks_frames_without_total() {
        let mut logger = SummaryPipelineLogger::new("s", 10);
        for i in 1..=23 {
            logger.progress(i, 0);
        }
        assert_eq!(logger.frames, 23);
    }

    #[test]
    fn test_info_stores_messages() {
        let mut logger = SummaryPipelineLogger::new("s", 10);
        logger.info("hello world");
        assert_eq!(logger.messages, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_zero_throttle_is_clamped() {
        let logger = SummaryPipelineLogger::new("s", 0);
        assert_eq!(logger.throttle_frames, 1);
    }
}
