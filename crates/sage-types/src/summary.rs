use serde::{Deserialize, Serialize};

/// Overview figures for batch/aggregate datasets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_models: usize,
    pub total_data_points: usize,
    pub total_energy_usage: f64,
    pub avg_energy_usage: f64,
    pub avg_confidence: f64,
    pub avg_inference_time: f64,
}

/// Overview figures for vision-instant datasets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisionSummary {
    pub total_data_points: usize,
    pub total_models: usize,
    pub total_cpu_usage: f64,
    /// Battery level of the earliest sample minus that of the latest.
    pub total_battery_consumption: f64,
    pub avg_instantaneous_confidence: f64,
    pub max_instantaneous_confidence: f64,
    pub avg_battery_level: f64,
    pub total_predictions: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LlmSummary {
    pub total_models: usize,
    pub total_data_points: usize,
    pub avg_energy_usage: f64,
    pub avg_ewma_score: f64,
    pub avg_input_token_size: f64,
    pub avg_output_token_size: f64,
    pub avg_temperature: f64,
    pub total_energy_consumption: f64,
}
