//! End-to-end pipeline: rows -> typed records -> chart-ready dashboards.

mod dashboard;

use rand::{rngs::StdRng, SeedableRng};
use sage_normalize::{normalize_dataset, NormalizeOptions};
use sage_ops::DatasetStore;
use sage_stats::{
    aggregate::{summarize_batch, summarize_llm, summarize_vision},
    correlation::{BatchCorrelation, BootstrapOptions},
    cumulative::{
        batch_energy_by_id, llm_energy_by_time, vision_battery_by_time, vision_cpu_by_time,
    },
    efficiency::{
        batch_model_efficiency, efficiency_series, energy_per_confidence_series,
        vision_model_comparison,
    },
    grouping::{group_by_model, model_frequency},
    quartile::model_boxes,
    scatter::LlmScatter,
};
use sage_types::{
    config::{AnalysisConfig, SageConfig},
    dataset::{Dataset, StoredDataset},
    raw::RawRow,
    records::{BatchRecord, LlmRecord, RecordSchema, VisionRecord},
    series::EfficiencyKind,
    Result,
};
use tracing::info;

pub use dashboard::{BatchDashboard, Dashboard, LlmDashboard, LlmScatterSeries, VisionDashboard};

/// Pure transformation from rows or datasets to dashboards.
#[derive(Debug, Clone)]
pub struct DashboardPipeline {
    normalize: NormalizeOptions,
    analysis: AnalysisConfig,
}

impl DashboardPipeline {
    pub fn new(config: &SageConfig) -> Self {
        Self {
            normalize: NormalizeOptions::from(&config.normalizer),
            analysis: config.analysis.clone(),
        }
    }

    pub fn normalize(&self, schema: RecordSchema, rows: &[RawRow]) -> Result<Dataset> {
        normalize_dataset(schema, rows, self.normalize)
    }

    /// Fresh random source per analysis, so a configured seed reproduces every chart.
    fn rng(&self) -> StdRng {
        match self.analysis.bootstrap_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn analyze(&self, dataset: &Dataset) -> Dashboard {
        info!("Analyzing {} {} records", dataset.len(), dataset.schema());
        match dataset {
            Dataset::Vision(records) => Dashboard::Vision(self.vision(records)),
            Dataset::Batch(records) => Dashboard::Batch(self.batch(records)),
            Dataset::Llm(records) => Dashboard::Llm(self.llm(records)),
        }
    }

    fn batch(&self, records: &[BatchRecord]) -> BatchDashboard {
        let options = BootstrapOptions::from(&self.analysis);
        let mut rng = self.rng();
        BatchDashboard {
            summary: summarize_batch(records),
            frequency: model_frequency(records),
            cumulative_energy: batch_energy_by_id(records),
            energy_boxes: model_boxes(&group_by_model(records), |r| r.energy_usage),
            energy_confidence: BatchCorrelation::EnergyConfidence.per_model(
                records,
                &options,
                &mut rng,
            ),
            energy_inference: BatchCorrelation::EnergyInference.per_model(
                records,
                &options,
                &mut rng,
            ),
            energy_per_confidence: energy_per_confidence_series(records),
            model_efficiency: batch_model_efficiency(records, self.analysis.efficiency_formula),
        }
    }

    fn vision(&self, records: &[VisionRecord]) -> VisionDashboard {
        VisionDashboard {
            summary: summarize_vision(records),
            frequency: model_frequency(records),
            cumulative_cpu: vision_cpu_by_time(records),
            cumulative_battery: vision_battery_by_time(records),
            confidence_boxes: model_boxes(&group_by_model(records), |r| {
                r.instantaneous_confidence
            }),
            cpu_efficiency: efficiency_series(records, EfficiencyKind::Cpu),
            battery_efficiency: efficiency_series(records, EfficiencyKind::Battery),
            model_comparison: vision_model_comparison(records, self.analysis.efficiency_formula),
        }
    }

    fn llm(&self, records: &[LlmRecord]) -> LlmDashboard {
        let [energy_vs_ewma, output_tokens_vs_energy, output_tokens_vs_ewma, cpu_vs_energy] =
            LlmScatter::ALL.map(|view| view.series(records));
        LlmDashboard {
            summary: summarize_llm(records),
            frequency: model_frequency(records),
            scatter: LlmScatterSeries {
                energy_vs_ewma,
                output_tokens_vs_energy,
                output_tokens_vs_ewma,
                cpu_vs_energy,
            },
            cumulative_energy: llm_energy_by_time(records),
        }
    }
}

/// Pipeline bound to a dataset store. Each ingest replaces the stored dataset.
pub struct DashboardSession<S: DatasetStore> {
    pipeline: DashboardPipeline,
    store: S,
}

impl<S: DatasetStore> DashboardSession<S> {
    pub fn new(pipeline: DashboardPipeline, store: S) -> Self {
        Self { pipeline, store }
    }

    pub fn pipeline(&self) -> &DashboardPipeline {
        &self.pipeline
    }

    /// Normalizes `rows` and stores the result. Nothing is stored when validation fails.
    pub fn ingest(&mut self, schema: RecordSchema, rows: &[RawRow]) -> Result<Dataset> {
        let dataset = self.pipeline.normalize(schema, rows)?;
        self.store.save(StoredDataset::new(dataset.clone()))?;
        info!("Ingested {} {} rows", dataset.len(), schema);
        Ok(dataset)
    }

    pub fn load(&self) -> Result<Option<Dataset>> {
        Ok(self.store.load()?.map(|snapshot| snapshot.dataset))
    }

    pub fn dashboard(&self) -> Result<Option<Dashboard>> {
        Ok(self.load()?.map(|dataset| self.pipeline.analyze(&dataset)))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()
    }
}
