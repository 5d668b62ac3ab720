//! Whole-dataset overview figures.

use std::collections::HashSet;

use sage_types::{
    records::{BatchRecord, LlmRecord, ModelSample, VisionRecord},
    summary::{BatchSummary, LlmSummary, VisionSummary},
};

use crate::mean;

/// Number of distinct model names, compared exactly.
pub fn distinct_models<T: ModelSample>(records: &[T]) -> usize {
    records
        .iter()
        .map(|record| record.model_name())
        .collect::<HashSet<_>>()
        .len()
}

fn total<T>(records: &[T], value: impl Fn(&T) -> f64) -> f64 {
    records.iter().map(value).sum()
}

pub fn summarize_batch(records: &[BatchRecord]) -> BatchSummary {
    let count = records.len();
    let total_energy_usage = total(records, |r| r.energy_usage);
    BatchSummary {
        total_models: distinct_models(records),
        total_data_points: count,
        total_energy_usage,
        avg_energy_usage: mean(total_energy_usage, count),
        avg_confidence: mean(total(records, |r| r.mean_confidence), count),
        avg_inference_time: mean(total(records, |r| r.mean_inference), count),
    }
}

/// Battery level at the earliest sample minus the level at the latest one.
fn battery_drain(records: &[VisionRecord]) -> f64 {
    let mut ordered: Vec<&VisionRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.instant());
    match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) => first.battery_level - last.battery_level,
        _ => 0.0,
    }
}

pub fn summarize_vision(records: &[VisionRecord]) -> VisionSummary {
    let count = records.len();
    let max_confidence = records
        .iter()
        .map(|r| r.instantaneous_confidence)
        .reduce(f64::max)
        .unwrap_or(0.0);
    let total_predictions = records
        .iter()
        .map(|r| r.current_total_predictions)
        .reduce(f64::max)
        .unwrap_or(0.0);
    VisionSummary {
        total_data_points: count,
        total_models: distinct_models(records),
        total_cpu_usage: total(records, |r| r.cpu_usage),
        total_battery_consumption: battery_drain(records),
        avg_instantaneous_confidence: mean(total(records, |r| r.instantaneous_confidence), count),
        max_instantaneous_confidence: max_confidence,
        avg_battery_level: mean(total(records, |r| r.battery_level), count),
        total_predictions,
    }
}

pub fn summarize_llm(records: &[LlmRecord]) -> LlmSummary {
    let count = records.len();
    let total_energy = total(records, |r| r.energy_usage);
    LlmSummary {
        total_models: distinct_models(records),
        total_data_points: count,
        avg_energy_usage: mean(total_energy, count),
        avg_ewma_score: mean(total(records, |r| r.ewma_score), count),
        avg_input_token_size: mean(total(records, |r| r.input_token_size), count),
        avg_output_token_size: mean(total(records, |r| r.output_token_size), count),
        avg_temperature: mean(total(records, |r| r.temperature), count),
        total_energy_consumption: total_energy,
    }
}
