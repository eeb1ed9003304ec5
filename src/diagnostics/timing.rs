use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Wall-clock time spent in one stage of a transform request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Ordered stage timings of one request plus their total.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.total_ms += elapsed_ms;
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Run `f`, record its duration under `label` and pass its value through.
    pub fn time<T>(&mut self, label: impl Into<String>, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let value = f();
        self.push(label, start.elapsed().as_secs_f64() * 1000.0);
        value
    }

    pub fn stage(&self, label: &str) -> Option<&StageTiming> {
        self.stages.iter().find(|s| s.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_accumulates_stages() {
        let mut t = TimingBreakdown::default();
        t.push("decode", 1.5);
        t.push("kernel", 2.0);
        assert_eq!(t.total_ms, 3.5);
        assert_eq!(t.stage("kernel").map(|s| s.elapsed_ms), Some(2.0));
        assert!(t.stage("encode").is_none());
    }

    #[test]
    fn time_passes_value_through() {
        let mut t = TimingBreakdown::default();
        let v = t.time("work", || 41 + 1);
        assert_eq!(v, 42);
        assert_eq!(t.stages.len(), 1);
        assert!(t.total_ms >= 0.0);
    }

    #[test]
    fn serialises_camel_case() {
        let mut t = TimingBreakdown::default();
        t.push("kernel", 1.0);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"totalMs\""));
        assert!(json.contains("\"elapsedMs\""));
    }
}
