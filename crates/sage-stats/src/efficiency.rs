//! Confidence-per-cost ratios per record and per model.

use sage_types::{
    config::GroupEfficiencyFormula,
    records::{BatchRecord, LlmRecord, ModelSample, VisionRecord},
    series::{
        BatchModelEfficiency, EfficiencyKind, EfficiencyPoint, EnergyPerConfidencePoint,
        VisionModelComparison,
    },
};

use crate::{grouping::group_by_model, mean};

/// `confidence / cost`, with a zero or negative cost reported as zero efficiency.
pub fn efficiency(confidence: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        confidence / cost
    } else {
        0.0
    }
}

/// Records that expose a confidence-like figure and one or more resource costs.
pub trait EfficiencySource: ModelSample {
    fn confidence(&self) -> f64;

    /// Cost for `kind`, or `None` when the record does not measure it.
    fn cost(&self, kind: EfficiencyKind) -> Option<f64>;

    fn efficiency(&self, kind: EfficiencyKind) -> Option<f64> {
        self.cost(kind)
            .map(|cost| efficiency(self.confidence(), cost))
    }
}

impl EfficiencySource for VisionRecord {
    fn confidence(&self) -> f64 {
        self.instantaneous_confidence
    }

    fn cost(&self, kind: EfficiencyKind) -> Option<f64> {
        match kind {
            EfficiencyKind::Cpu => Some(self.cpu_usage),
            EfficiencyKind::Battery => Some(self.battery_consumption),
            EfficiencyKind::Energy => None,
        }
    }
}

impl EfficiencySource for BatchRecord {
    fn confidence(&self) -> f64 {
        self.mean_confidence
    }

    fn cost(&self, kind: EfficiencyKind) -> Option<f64> {
        match kind {
            EfficiencyKind::Energy => Some(self.energy_usage),
            EfficiencyKind::Cpu | EfficiencyKind::Battery => None,
        }
    }
}

impl EfficiencySource for LlmRecord {
    fn confidence(&self) -> f64 {
        self.ewma_score
    }

    fn cost(&self, kind: EfficiencyKind) -> Option<f64> {
        Some(match kind {
            EfficiencyKind::Cpu => self.cpu_usage,
            EfficiencyKind::Battery => self.battery_consumption,
            EfficiencyKind::Energy => self.energy_usage,
        })
    }
}

/// Per-record efficiency ordered by timestamp. Empty when the kind is not measured.
pub fn efficiency_series<T: EfficiencySource>(
    records: &[T],
    kind: EfficiencyKind,
) -> Vec<EfficiencyPoint> {
    let mut ordered: Vec<&T> = records.iter().collect();
    ordered.sort_by_key(|record| record.instant());

    ordered
        .into_iter()
        .filter_map(|record| {
            let cost = record.cost(kind)?;
            Some((record, cost))
        })
        .enumerate()
        .map(|(idx, (record, cost))| EfficiencyPoint {
            index: idx + 1,
            timestamp: record.instant(),
            model: record.model_name().to_string(),
            efficiency: efficiency(record.confidence(), cost),
            cost,
            confidence: record.confidence(),
        })
        .collect()
}

/// Aggregated efficiency of one group of records.
pub fn group_efficiency<T: EfficiencySource>(
    records: &[&T],
    kind: EfficiencyKind,
    formula: GroupEfficiencyFormula,
) -> f64 {
    let measured: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|record| Some((record.confidence(), record.cost(kind)?)))
        .collect();
    let count = measured.len();
    match formula {
        GroupEfficiencyFormula::RatioOfAverages => {
            let confidence: f64 = measured.iter().map(|(c, _)| c).sum();
            let cost: f64 = measured.iter().map(|(_, c)| c).sum();
            efficiency(mean(confidence, count), mean(cost, count))
        }
        GroupEfficiencyFormula::AverageOfRatios => {
            let ratios: f64 = measured
                .iter()
                .map(|(confidence, cost)| efficiency(*confidence, *cost))
                .sum();
            mean(ratios, count)
        }
    }
}

/// Energy cost per unit of confidence, ordered by batch id.
pub fn energy_per_confidence_series(records: &[BatchRecord]) -> Vec<EnergyPerConfidencePoint> {
    let mut ordered: Vec<&BatchRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.id);
    ordered
        .into_iter()
        .map(|record| EnergyPerConfidencePoint {
            id: record.id,
            model: record.model_name.clone(),
            energy_per_confidence: record.energy_per_confidence,
            energy_usage: record.energy_usage,
            mean_confidence: record.mean_confidence,
        })
        .collect()
}

pub fn batch_model_efficiency(
    records: &[BatchRecord],
    formula: GroupEfficiencyFormula,
) -> Vec<BatchModelEfficiency> {
    group_by_model(records)
        .into_iter()
        .map(|group| {
            let count = group.len();
            let total_energy: f64 = group.records.iter().map(|r| r.energy_usage).sum();
            let confidence: f64 = group.records.iter().map(|r| r.mean_confidence).sum();
            let inference: f64 = group.records.iter().map(|r| r.mean_inference).sum();
            BatchModelEfficiency {
                efficiency: group_efficiency(&group.records, EfficiencyKind::Energy, formula),
                total_energy,
                avg_confidence: mean(confidence, count),
                avg_inference: mean(inference, count),
                formula,
                count,
                model: group.key,
            }
        })
        .collect()
}

pub fn vision_model_comparison(
    records: &[VisionRecord],
    formula: GroupEfficiencyFormula,
) -> Vec<VisionModelComparison> {
    group_by_model(records)
        .into_iter()
        .map(|group| {
            let count = group.len();
            let cpu: f64 = group.records.iter().map(|r| r.cpu_usage).sum();
            let battery: f64 = group.records.iter().map(|r| r.battery_consumption).sum();
            let confidence: f64 = group
                .records
                .iter()
                .map(|r| r.instantaneous_confidence)
                .sum();
            let inference: f64 = group.records.iter().map(|r| r.inference_time).sum();
            VisionModelComparison {
                cpu_efficiency: group_efficiency(&group.records, EfficiencyKind::Cpu, formula),
                battery_efficiency: group_efficiency(
                    &group.records,
                    EfficiencyKind::Battery,
                    formula,
                ),
                avg_cpu_usage: mean(cpu, count),
                avg_battery_consumption: mean(battery, count),
                avg_confidence: mean(confidence, count),
                avg_inference_time: mean(inference, count),
                formula,
                count,
                model: group.key,
            }
        })
        .collect()
}
