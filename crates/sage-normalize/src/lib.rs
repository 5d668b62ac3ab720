//! Validation and coercion of parsed rows into typed monitoring records.

mod inference;
mod shapes;

use sage_types::{
    config::{InferenceOrdering, NormalizerConfig},
    dataset::Dataset,
    raw::{RawRow, RawValue},
    records::RecordSchema,
    time::now_timestamp,
    Result, SageError,
};
use tracing::{debug, info, warn};

pub use inference::derive_inference_times;

/// Behaviour switches for a normalization run.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub inference_ordering: InferenceOrdering,
}

impl From<&NormalizerConfig> for NormalizeOptions {
    fn from(config: &NormalizerConfig) -> Self {
        Self {
            inference_ordering: config.inference_ordering,
        }
    }
}

/// A numeric cell that could not be read and was replaced by zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub row: usize,
    pub field: &'static str,
}

/// Per-run cell reader that records soft parse failures.
#[derive(Debug, Default)]
pub struct Coercer {
    row: usize,
    warnings: Vec<ParseWarning>,
}

impl Coercer {
    fn at_row(&mut self, row: usize) {
        self.row = row;
    }

    pub fn number(&mut self, row: &RawRow, field: &'static str) -> f64 {
        match row.get(field).and_then(RawValue::as_number) {
            Some(value) => value,
            None => {
                self.warnings.push(ParseWarning {
                    row: self.row,
                    field,
                });
                0.0
            }
        }
    }

    /// Numeric cell that is derived when absent, so no warning is recorded.
    pub fn optional_number(&self, row: &RawRow, field: &str) -> Option<f64> {
        row.get(field).and_then(RawValue::as_number)
    }

    pub fn text(&self, row: &RawRow, field: &str) -> String {
        self.optional_text(row, field).unwrap_or_default()
    }

    pub fn optional_text(&self, row: &RawRow, field: &str) -> Option<String> {
        row.get(field).and_then(RawValue::as_text)
    }

    pub fn timestamp(&self, row: &RawRow, field: &str) -> String {
        self.optional_text(row, field)
            .unwrap_or_else(now_timestamp)
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }
}

/// A typed record shape that rows can be normalized into.
pub trait RecordShape: Sized {
    const SCHEMA: RecordSchema;

    fn from_row(row: &RawRow, coercer: &mut Coercer) -> Self;

    fn to_row(&self) -> RawRow;

    /// Fills in fields that depend on neighbouring records. `rows[i]` is the source of `records[i]`.
    fn finish(records: Vec<Self>, _rows: &[RawRow], _options: &NormalizeOptions) -> Vec<Self> {
        records
    }
}

/// Checks the first row against the schema's required columns.
pub fn validate_required(schema: RecordSchema, first: &RawRow) -> Result<()> {
    let missing: Vec<String> = schema
        .required_fields()
        .iter()
        .filter(|field| !first.contains(**field))
        .map(|field| field.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SageError::validation(schema, missing))
    }
}

/// Normalizes rows into records of shape `R`.
///
/// Empty input yields an empty collection. Validation failures abort the whole run.
pub fn normalize<R: RecordShape>(rows: &[RawRow], options: NormalizeOptions) -> Result<Vec<R>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    validate_required(R::SCHEMA, first)?;

    let mut coercer = Coercer::default();
    let records: Vec<R> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            coercer.at_row(idx);
            R::from_row(row, &mut coercer)
        })
        .collect();

    let warnings = coercer.warnings();
    for warning in warnings {
        debug!(
            "row {} field {} is not numeric, using 0",
            warning.row, warning.field
        );
    }
    if !warnings.is_empty() {
        warn!(
            "{} {} cells could not be parsed and were replaced by 0",
            warnings.len(),
            R::SCHEMA
        );
    }

    let records = R::finish(records, rows, &options);
    info!("Normalized {} {} rows", rows.len(), R::SCHEMA);
    Ok(records)
}

/// Converts records back into rows.
pub fn to_rows<R: RecordShape>(records: &[R]) -> Vec<RawRow> {
    records.iter().map(RecordShape::to_row).collect()
}

/// Normalizes rows into the dataset variant named by `schema`.
pub fn normalize_dataset(
    schema: RecordSchema,
    rows: &[RawRow],
    options: NormalizeOptions,
) -> Result<Dataset> {
    Ok(match schema {
        RecordSchema::Vision => Dataset::Vision(normalize(rows, options)?),
        RecordSchema::Batch => Dataset::Batch(normalize(rows, options)?),
        RecordSchema::Llm => Dataset::Llm(normalize(rows, options)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_types::records::{fields, BatchRecord, LlmRecord, VisionRecord};

    fn batch_row(id: u64, model: &str, energy: f64, confidence: f64, inference: f64) -> RawRow {
        RawRow::new()
            .with(fields::ID, id)
            .with(fields::MODEL_NAME, model)
            .with(fields::ENERGY_USAGE, energy)
            .with(fields::MEAN_CONFIDENCE, confidence)
            .with(fields::MEAN_INFERENCE, inference)
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let records: Vec<BatchRecord> =
            normalize(&[], NormalizeOptions::default()).expect("normalize");
        assert!(records.is_empty());
    }

    #[test]
    fn missing_required_fields_are_listed() {
        let rows = vec![RawRow::new()
            .with(fields::ID, 1u64)
            .with(fields::MODEL_NAME, "A")];
        let err = normalize::<BatchRecord>(&rows, NormalizeOptions::default()).unwrap_err();
        match err {
            SageError::Validation { schema, missing } => {
                assert_eq!(schema, RecordSchema::Batch);
                assert_eq!(
                    missing,
                    vec!["EnergyUsage", "MeanConfidence", "MeanInference"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_first_row_is_validated() {
        let rows = vec![
            batch_row(1, "A", 2.0, 0.5, 10.0),
            RawRow::new().with(fields::ID, 2u64),
        ];
        let records: Vec<BatchRecord> =
            normalize(&rows, NormalizeOptions::default()).expect("normalize");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].model_name, "");
        assert_eq!(records[1].energy_usage, 0.0);
    }

    #[test]
    fn unparseable_numbers_become_zero() {
        let rows = vec![batch_row(1, "A", 2.0, 0.5, 10.0)
            .with(fields::ENERGY_USAGE, "lots")
            .with(fields::MEAN_INFERENCE, "")];
        let records: Vec<BatchRecord> =
            normalize(&rows, NormalizeOptions::default()).expect("normalize");
        assert_eq!(records[0].energy_usage, 0.0);
        assert_eq!(records[0].mean_inference, 0.0);
        assert_eq!(records[0].energy_per_confidence, 0.0);
    }

    #[test]
    fn non_scalar_cells_become_zero() {
        let rows: Vec<RawRow> = serde_json::from_str(
            r#"[{"ID":1,"ModelName":"A","EnergyUsage":true,"MeanConfidence":[0.5],
                 "MeanInference":10}]"#,
        )
        .expect("rows");
        let records: Vec<BatchRecord> =
            normalize(&rows, NormalizeOptions::default()).expect("normalize");
        assert_eq!(records[0].energy_usage, 0.0);
        assert_eq!(records[0].mean_confidence, 0.0);
        assert_eq!(records[0].mean_inference, 10.0);
    }

    #[test]
    fn coercer_tracks_warnings() {
        let row = RawRow::new().with(fields::CPU_USAGE, "x");
        let mut coercer = Coercer::default();
        coercer.at_row(3);
        assert_eq!(coercer.number(&row, fields::CPU_USAGE), 0.0);
        assert_eq!(coercer.number(&row, fields::BATTERY_LEVEL), 0.0);
        assert_eq!(
            coercer.warnings(),
            &[
                ParseWarning {
                    row: 3,
                    field: fields::CPU_USAGE
                },
                ParseWarning {
                    row: 3,
                    field: fields::BATTERY_LEVEL
                }
            ]
        );
    }

    #[test]
    fn dataset_dispatch_follows_schema() {
        let rows = vec![RawRow::new()
            .with(fields::MODEL_ID, "m-1")
            .with(fields::MODEL_NAME, "tiny")
            .with(fields::BATTERY_LEVEL, 0.9)
            .with(fields::CPU_USAGE, 0.3)
            .with(fields::ENERGY_USAGE, 0.2)
            .with(fields::EWMA_SCORE, 0.8)];
        let dataset =
            normalize_dataset(RecordSchema::Llm, &rows, NormalizeOptions::default())
                .expect("normalize");
        assert_eq!(dataset.schema(), RecordSchema::Llm);
        assert_eq!(dataset.len(), 1);

        let err = normalize_dataset(RecordSchema::Vision, &rows, NormalizeOptions::default())
            .unwrap_err();
        assert!(matches!(err, SageError::Validation { .. }));
    }

    #[test]
    fn renormalizing_output_is_idempotent() {
        let batch_rows = vec![
            batch_row(2, "B", 4.0, 0.25, 20.0),
            batch_row(1, "A", 2.0, 0.5, 10.0).with(fields::ENERGY_PER_CONFIDENCE, 9.0),
        ];
        let batch: Vec<BatchRecord> =
            normalize(&batch_rows, NormalizeOptions::default()).expect("normalize");
        let again: Vec<BatchRecord> =
            normalize(&to_rows(&batch), NormalizeOptions::default()).expect("renormalize");
        assert_eq!(batch, again);

        let vision_rows: Vec<RawRow> = [
            ("2024-05-01T10:00:05Z", "B"),
            ("2024-05-01T10:00:00Z", "A"),
            ("2024-05-01T10:00:02Z", "A"),
        ]
        .iter()
        .map(|(ts, model)| {
            RawRow::new()
                .with(fields::TIMESTAMP, *ts)
                .with(fields::BATTERY_LEVEL, 80.0)
                .with(fields::CPU_USAGE, 30.0)
                .with(fields::BATTERY_CONSUMPTION, 0.1)
                .with(fields::SELECTED_MODEL, *model)
                .with(fields::INSTANTANEOUS_CONFIDENCE, 70.0)
        })
        .collect();
        for ordering in [InferenceOrdering::SortedByTimestamp, InferenceOrdering::InputOrder] {
            let options = NormalizeOptions {
                inference_ordering: ordering,
            };
            let vision: Vec<VisionRecord> = normalize(&vision_rows, options).expect("normalize");
            let again: Vec<VisionRecord> =
                normalize(&to_rows(&vision), options).expect("renormalize");
            assert_eq!(vision, again);
        }

        let llm_rows: Vec<RawRow> = serde_json::from_str(
            r#"[{"ModelId":"m","ModelName":"tiny","BatteryLevel":0.8,"CPUUsage":0.4,
                 "EnergyUsage":0.1,"EWMAScore":0.7,"Timestamp":"1714557600000",
                 "InputTokenSize":"128","OutputTokenSize":64}]"#,
        )
        .expect("rows");
        let llm: Vec<LlmRecord> = normalize(&llm_rows, NormalizeOptions::default()).expect("llm");
        let again: Vec<LlmRecord> =
            normalize(&to_rows(&llm), NormalizeOptions::default()).expect("renormalize");
        assert_eq!(llm, again);
        assert_eq!(llm[0].input_token_size, 128.0);
    }
}
