//! Chart-ready structures handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GroupEfficiencyFormula;

/// One point of a scatter series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub model: String,
    pub id: usize,
}

/// Order statistics for a box-plot style summary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBox {
    pub model: String,
    #[serde(flatten)]
    pub summary: BoxSummary,
}

/// Distribution of bootstrap correlation estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
    pub sample_correlations: Vec<f64>,
}

impl CorrelationResult {
    /// Neutral result reported for groups too small to resample.
    pub fn degenerate() -> Self {
        Self {
            median: 0.0,
            q1: 0.0,
            q3: 0.0,
            min: 0.0,
            max: 0.0,
            sample_correlations: vec![0.0],
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.sample_correlations == [0.0]
            && [self.median, self.q1, self.q3, self.min, self.max]
                .iter()
                .all(|v| *v == 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCorrelation {
    pub model: String,
    pub samples: usize,
    #[serde(flatten)]
    pub result: CorrelationResult,
}

/// Running-sum element keyed by the ordering field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint<K> {
    /// 1-based position in the ordered series.
    pub index: usize,
    pub key: K,
    pub value: f64,
    pub cumulative_value: f64,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub model: String,
    pub count: usize,
    pub percentage: f64,
}

/// Which resource a confidence figure is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyKind {
    Cpu,
    Battery,
    Energy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyPoint {
    pub index: usize,
    pub timestamp: Option<DateTime<Utc>>,
    pub model: String,
    pub efficiency: f64,
    pub cost: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyPerConfidencePoint {
    pub id: u64,
    pub model: String,
    pub energy_per_confidence: f64,
    pub energy_usage: f64,
    pub mean_confidence: f64,
}

/// Per-model efficiency row for batch datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchModelEfficiency {
    pub model: String,
    pub total_energy: f64,
    pub avg_confidence: f64,
    pub avg_inference: f64,
    pub efficiency: f64,
    pub formula: GroupEfficiencyFormula,
    pub count: usize,
}

/// Per-model comparison row for vision datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionModelComparison {
    pub model: String,
    pub cpu_efficiency: f64,
    pub battery_efficiency: f64,
    pub avg_cpu_usage: f64,
    pub avg_battery_consumption: f64,
    pub avg_confidence: f64,
    pub avg_inference_time: f64,
    pub formula: GroupEfficiencyFormula,
    pub count: usize,
}
