use sage_types::{
    raw::{RawRow, RawValue},
    records::{fields, BatchRecord, LlmRecord, RecordSchema, VisionRecord},
    time::parse_instant,
};

use crate::{derive_inference_times, Coercer, NormalizeOptions, RecordShape};

impl RecordShape for VisionRecord {
    const SCHEMA: RecordSchema = RecordSchema::Vision;

    fn from_row(row: &RawRow, coercer: &mut Coercer) -> Self {
        Self {
            timestamp: coercer.timestamp(row, fields::TIMESTAMP),
            battery_level: coercer.number(row, fields::BATTERY_LEVEL),
            cpu_usage: coercer.number(row, fields::CPU_USAGE),
            battery_consumption: coercer.number(row, fields::BATTERY_CONSUMPTION),
            selected_model: coercer.text(row, fields::SELECTED_MODEL),
            instantaneous_confidence: coercer.number(row, fields::INSTANTANEOUS_CONFIDENCE),
            average_confidence: coercer.number(row, fields::AVERAGE_CONFIDENCE),
            current_total_predictions: coercer.number(row, fields::CURRENT_TOTAL_PREDICTIONS),
            inference_time: 0.0,
        }
    }

    fn to_row(&self) -> RawRow {
        RawRow::new()
            .with(fields::TIMESTAMP, self.timestamp.as_str())
            .with(fields::BATTERY_LEVEL, self.battery_level)
            .with(fields::CPU_USAGE, self.cpu_usage)
            .with(fields::BATTERY_CONSUMPTION, self.battery_consumption)
            .with(fields::SELECTED_MODEL, self.selected_model.as_str())
            .with(
                fields::INSTANTANEOUS_CONFIDENCE,
                self.instantaneous_confidence,
            )
            .with(fields::AVERAGE_CONFIDENCE, self.average_confidence)
            .with(
                fields::CURRENT_TOTAL_PREDICTIONS,
                self.current_total_predictions,
            )
            .with(fields::INFERENCE_TIME, self.inference_time)
    }

    fn finish(records: Vec<Self>, rows: &[RawRow], options: &NormalizeOptions) -> Vec<Self> {
        // Defaulted timestamps carry no ordering information.
        let instants: Vec<_> = rows
            .iter()
            .map(|row| {
                row.get(fields::TIMESTAMP)
                    .and_then(RawValue::as_text)
                    .and_then(|ts| parse_instant(&ts))
            })
            .collect();
        derive_inference_times(records, &instants, options.inference_ordering)
    }
}

impl RecordShape for BatchRecord {
    const SCHEMA: RecordSchema = RecordSchema::Batch;

    fn from_row(row: &RawRow, coercer: &mut Coercer) -> Self {
        let energy_usage = coercer.number(row, fields::ENERGY_USAGE);
        let mean_confidence = coercer.number(row, fields::MEAN_CONFIDENCE);
        let energy_per_confidence = coercer
            .optional_number(row, fields::ENERGY_PER_CONFIDENCE)
            .unwrap_or_else(|| {
                BatchRecord::derive_energy_per_confidence(energy_usage, mean_confidence)
            });
        Self {
            // Negative and fractional ids saturate/truncate.
            id: coercer.number(row, fields::ID) as u64,
            model_name: coercer.text(row, fields::MODEL_NAME),
            energy_usage,
            mean_confidence,
            mean_inference: coercer.number(row, fields::MEAN_INFERENCE),
            energy_per_confidence,
            timestamp: coercer.optional_text(row, fields::TIMESTAMP),
        }
    }

    fn to_row(&self) -> RawRow {
        let row = RawRow::new()
            .with(fields::ID, self.id)
            .with(fields::MODEL_NAME, self.model_name.as_str())
            .with(fields::ENERGY_USAGE, self.energy_usage)
            .with(fields::MEAN_CONFIDENCE, self.mean_confidence)
            .with(fields::MEAN_INFERENCE, self.mean_inference)
            .with(fields::ENERGY_PER_CONFIDENCE, self.energy_per_confidence);
        match &self.timestamp {
            Some(ts) => row.with(fields::TIMESTAMP, ts.as_str()),
            None => row,
        }
    }
}

impl RecordShape for LlmRecord {
    const SCHEMA: RecordSchema = RecordSchema::Llm;

    fn from_row(row: &RawRow, coercer: &mut Coercer) -> Self {
        Self {
            model_id: coercer.text(row, fields::MODEL_ID),
            model_name: coercer.text(row, fields::MODEL_NAME),
            battery_level: coercer.number(row, fields::BATTERY_LEVEL),
            cpu_usage: coercer.number(row, fields::CPU_USAGE),
            temperature: coercer.number(row, fields::TEMPERATURE),
            battery_consumption: coercer.number(row, fields::BATTERY_CONSUMPTION),
            user_feedback: coercer.number(row, fields::USER_FEEDBACK),
            energy_usage: coercer.number(row, fields::ENERGY_USAGE),
            input_token_size: coercer.number(row, fields::INPUT_TOKEN_SIZE),
            output_token_size: coercer.number(row, fields::OUTPUT_TOKEN_SIZE),
            timestamp: coercer.timestamp(row, fields::TIMESTAMP),
            ewma_score: coercer.number(row, fields::EWMA_SCORE),
        }
    }

    fn to_row(&self) -> RawRow {
        RawRow::new()
            .with(fields::MODEL_ID, self.model_id.as_str())
            .with(fields::MODEL_NAME, self.model_name.as_str())
            .with(fields::BATTERY_LEVEL, self.battery_level)
            .with(fields::CPU_USAGE, self.cpu_usage)
            .with(fields::TEMPERATURE, self.temperature)
            .with(fields::BATTERY_CONSUMPTION, self.battery_consumption)
            .with(fields::USER_FEEDBACK, self.user_feedback)
            .with(fields::ENERGY_USAGE, self.energy_usage)
            .with(fields::INPUT_TOKEN_SIZE, self.input_token_size)
            .with(fields::OUTPUT_TOKEN_SIZE, self.output_token_size)
            .with(fields::TIMESTAMP, self.timestamp.as_str())
            .with(fields::EWMA_SCORE, self.ewma_score)
    }
}
