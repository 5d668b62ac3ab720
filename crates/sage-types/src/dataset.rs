use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::records::{BatchRecord, LlmRecord, RecordSchema, VisionRecord};

/// A fully normalized record collection of one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "schema", content = "records", rename_all = "lowercase")]
pub enum Dataset {
    Vision(Vec<VisionRecord>),
    Batch(Vec<BatchRecord>),
    Llm(Vec<LlmRecord>),
}

impl Dataset {
    pub fn schema(&self) -> RecordSchema {
        match self {
            Dataset::Vision(_) => RecordSchema::Vision,
            Dataset::Batch(_) => RecordSchema::Batch,
            Dataset::Llm(_) => RecordSchema::Llm,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Vision(records) => records.len(),
            Dataset::Batch(records) => records.len(),
            Dataset::Llm(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Envelope written by dataset stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDataset {
    pub id: Uuid,
    pub saved_at: DateTime<Utc>,
    pub dataset: Dataset,
}

impl StoredDataset {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            id: Uuid::new_v4(),
            saved_at: Utc::now(),
            dataset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_serializes_with_schema_tag() {
        let dataset = Dataset::Batch(vec![BatchRecord {
            id: 1,
            model_name: "A".into(),
            energy_usage: 2.0,
            mean_confidence: 0.5,
            mean_inference: 10.0,
            energy_per_confidence: 4.0,
            timestamp: None,
        }]);
        let json = serde_json::to_value(&dataset).expect("serialize dataset");
        assert_eq!(json["schema"], "batch");
        assert_eq!(json["records"][0]["model_name"], "A");

        let back: Dataset = serde_json::from_value(json).expect("deserialize dataset");
        assert_eq!(back, dataset);
        assert_eq!(back.schema(), RecordSchema::Batch);
        assert_eq!(back.len(), 1);
    }
}
