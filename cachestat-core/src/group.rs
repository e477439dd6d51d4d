use serde::{Deserialize, Serialize};

use crate::stats::{Ecdf, Estimate};

/// One measured condition: a workload pattern under a cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGroup {
    /// Human-readable label, e.g. "(a) Random,  Cache ON".
    pub label: String,
    /// Access latencies in cycles, in recorded order.
    pub samples: Vec<i64>,
    /// Worst-case access latency in cycles for this configuration.
    pub worst_case: i64,
}

impl SampleGroup {
    /// Create a new sample group.
    pub fn new(label: impl Into<String>, samples: Vec<i64>, worst_case: i64) -> Self {
        Self {
            label: label.into(),
            samples,
            worst_case,
        }
    }

    /// The samples as floating point values for the statistical engine.
    pub fn as_f64(&self) -> Vec<f64> {
        self.samples.iter().map(|&s| s as f64).collect()
    }
}

/// Numeric results for one group, ready for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub worst_case: i64,
    pub sample_count: usize,
    /// Mean access time and its confidence interval.
    pub mean: Estimate,
    /// Fraction of accesses strictly faster than the worst case.
    pub fraction_below: Estimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecdf: Option<Ecdf>,
}
