use thiserror::Error;

use crate::records::RecordSchema;

pub type Result<T, E = SageError> = std::result::Result<T, E>;

/// Unified error type covering the failure scenarios of the analytics core.
#[derive(Debug, Error)]
pub enum SageError {
    #[error("{schema} rows are missing required fields: {}", .missing.join(", "))]
    Validation {
        schema: RecordSchema,
        missing: Vec<String>,
    },
    #[error("cannot summarise an empty series: {0}")]
    EmptySeries(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("operational error: {0}")]
    Ops(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SageError {
    pub fn validation(schema: RecordSchema, missing: Vec<String>) -> Self {
        SageError::Validation { schema, missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_missing_fields() {
        let err = SageError::validation(
            RecordSchema::Batch,
            vec!["ID".into(), "MeanInference".into()],
        );
        assert_eq!(
            err.to_string(),
            "batch rows are missing required fields: ID, MeanInference"
        );
    }
}
