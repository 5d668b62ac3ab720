use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sage_types::{
    series::{
        BatchModelEfficiency, CumulativePoint, EfficiencyPoint, EnergyPerConfidencePoint,
        FrequencyEntry, ModelBox, ModelCorrelation, ScatterPoint, VisionModelComparison,
    },
    summary::{BatchSummary, LlmSummary, VisionSummary},
};

type TimeKey = Option<DateTime<Utc>>;

/// Chart data for one dataset, tagged with its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "lowercase")]
pub enum Dashboard {
    Vision(VisionDashboard),
    Batch(BatchDashboard),
    Llm(LlmDashboard),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDashboard {
    pub summary: BatchSummary,
    pub frequency: Vec<FrequencyEntry>,
    pub cumulative_energy: Vec<CumulativePoint<u64>>,
    pub energy_boxes: Vec<ModelBox>,
    pub energy_confidence: Vec<ModelCorrelation>,
    pub energy_inference: Vec<ModelCorrelation>,
    pub energy_per_confidence: Vec<EnergyPerConfidencePoint>,
    pub model_efficiency: Vec<BatchModelEfficiency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionDashboard {
    pub summary: VisionSummary,
    pub frequency: Vec<FrequencyEntry>,
    pub cumulative_cpu: Vec<CumulativePoint<TimeKey>>,
    pub cumulative_battery: Vec<CumulativePoint<TimeKey>>,
    pub confidence_boxes: Vec<ModelBox>,
    pub cpu_efficiency: Vec<EfficiencyPoint>,
    pub battery_efficiency: Vec<EfficiencyPoint>,
    pub model_comparison: Vec<VisionModelComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmScatterSeries {
    pub energy_vs_ewma: Vec<ScatterPoint>,
    pub output_tokens_vs_energy: Vec<ScatterPoint>,
    pub output_tokens_vs_ewma: Vec<ScatterPoint>,
    pub cpu_vs_energy: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmDashboard {
    pub summary: LlmSummary,
    pub frequency: Vec<FrequencyEntry>,
    pub scatter: LlmScatterSeries,
    pub cumulative_energy: Vec<CumulativePoint<TimeKey>>,
}
