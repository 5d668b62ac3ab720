use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::parse_instant;

/// Column names used by the monitoring exports.
pub mod fields {
    pub const TIMESTAMP: &str = "Timestamp";
    pub const BATTERY_LEVEL: &str = "BatteryLevel";
    pub const CPU_USAGE: &str = "CPUUsage";
    pub const BATTERY_CONSUMPTION: &str = "BatteryConsumption";
    pub const SELECTED_MODEL: &str = "SelectedModel";
    pub const INSTANTANEOUS_CONFIDENCE: &str = "InstantaneousConfidence";
    pub const AVERAGE_CONFIDENCE: &str = "AverageConfidence";
    pub const CURRENT_TOTAL_PREDICTIONS: &str = "CurrentTotalPredictions";
    pub const INFERENCE_TIME: &str = "InferenceTime";

    pub const ID: &str = "ID";
    pub const MODEL_NAME: &str = "ModelName";
    pub const ENERGY_USAGE: &str = "EnergyUsage";
    pub const MEAN_CONFIDENCE: &str = "MeanConfidence";
    pub const MEAN_INFERENCE: &str = "MeanInference";
    pub const ENERGY_PER_CONFIDENCE: &str = "EnergyPerConfidence";

    pub const MODEL_ID: &str = "ModelId";
    pub const TEMPERATURE: &str = "Temperature";
    pub const USER_FEEDBACK: &str = "UserFeedback";
    pub const INPUT_TOKEN_SIZE: &str = "InputTokenSize";
    pub const OUTPUT_TOKEN_SIZE: &str = "OutputTokenSize";
    pub const EWMA_SCORE: &str = "EWMAScore";
}

/// Lower bound applied to confidence before dividing energy by it.
pub const CONFIDENCE_EPSILON: f64 = 0.001;

/// The record shapes the normalizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSchema {
    Vision,
    Batch,
    Llm,
}

impl RecordSchema {
    pub fn required_fields(self) -> &'static [&'static str] {
        use fields::*;
        match self {
            RecordSchema::Vision => &[
                TIMESTAMP,
                BATTERY_LEVEL,
                CPU_USAGE,
                BATTERY_CONSUMPTION,
                SELECTED_MODEL,
                INSTANTANEOUS_CONFIDENCE,
            ],
            RecordSchema::Batch => &[ID, MODEL_NAME, ENERGY_USAGE, MEAN_CONFIDENCE, MEAN_INFERENCE],
            RecordSchema::Llm => &[
                MODEL_ID,
                MODEL_NAME,
                BATTERY_LEVEL,
                CPU_USAGE,
                ENERGY_USAGE,
                EWMA_SCORE,
            ],
        }
    }
}

impl fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordSchema::Vision => "vision",
            RecordSchema::Batch => "batch",
            RecordSchema::Llm => "llm",
        };
        f.write_str(name)
    }
}

/// Common view over records that belong to a model and may carry a timestamp.
pub trait ModelSample {
    fn model_name(&self) -> &str;

    fn instant(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// One sampled observation of an on-device model-selection event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionRecord {
    pub timestamp: String,
    pub battery_level: f64,
    pub cpu_usage: f64,
    pub battery_consumption: f64,
    pub selected_model: String,
    pub instantaneous_confidence: f64,
    pub average_confidence: f64,
    pub current_total_predictions: f64,
    /// Seconds since the previous sample in timestamp order.
    pub inference_time: f64,
}

impl ModelSample for VisionRecord {
    fn model_name(&self) -> &str {
        &self.selected_model
    }

    fn instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.timestamp)
    }
}

/// One completed inference batch with precomputed aggregate metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: u64,
    pub model_name: String,
    pub energy_usage: f64,
    pub mean_confidence: f64,
    /// Milliseconds.
    pub mean_inference: f64,
    pub energy_per_confidence: f64,
    pub timestamp: Option<String>,
}

impl BatchRecord {
    pub fn derive_energy_per_confidence(energy_usage: f64, mean_confidence: f64) -> f64 {
        energy_usage / mean_confidence.max(CONFIDENCE_EPSILON)
    }
}

impl ModelSample for BatchRecord {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn instant(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_instant)
    }
}

/// One language-model inference event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRecord {
    pub model_id: String,
    pub model_name: String,
    pub battery_level: f64,
    pub cpu_usage: f64,
    pub temperature: f64,
    pub battery_consumption: f64,
    pub user_feedback: f64,
    pub energy_usage: f64,
    pub input_token_size: f64,
    pub output_token_size: f64,
    pub timestamp: String,
    pub ewma_score: f64,
}

impl ModelSample for LlmRecord {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn instant(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_per_confidence_guards_small_confidence() {
        assert_eq!(BatchRecord::derive_energy_per_confidence(2.0, 0.5), 4.0);
        assert_eq!(BatchRecord::derive_energy_per_confidence(2.0, 0.0), 2000.0);
    }

    #[test]
    fn schema_display_and_fields() {
        assert_eq!(RecordSchema::Llm.to_string(), "llm");
        assert!(RecordSchema::Vision
            .required_fields()
            .contains(&fields::SELECTED_MODEL));
        assert_eq!(RecordSchema::Batch.required_fields().len(), 5);
    }
}
