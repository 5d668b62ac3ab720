//! Pearson correlation and its bootstrap distribution per model.

use rand::Rng;
use sage_types::{
    config::AnalysisConfig,
    records::{BatchRecord, ModelSample},
    series::{CorrelationResult, ModelCorrelation},
};
use tracing::debug;

use crate::{grouping::group_by_model, quartile::sorted_quartiles};

pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 100;
pub const MIN_BOOTSTRAP_SAMPLES: usize = 10;

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns 0 when the coefficient is undefined: mismatched lengths, fewer than two
/// samples, or a series with zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_x_sq = 0.0;
    let mut sum_y_sq = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_x_sq += dx * dx;
        sum_y_sq += dy * dy;
    }

    let denominator = (sum_x_sq * sum_y_sq).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BootstrapOptions {
    pub iterations: usize,
    pub min_samples: usize,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            min_samples: MIN_BOOTSTRAP_SAMPLES,
        }
    }
}

impl From<&AnalysisConfig> for BootstrapOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            iterations: config.bootstrap_iterations,
            min_samples: config.min_bootstrap_samples,
        }
    }
}

/// Bootstrap distribution of the Pearson coefficient.
///
/// Draws `iterations` resamples of the paired series with replacement. Series shorter
/// than `min_samples` get the degenerate all-zero result instead.
pub fn bootstrap_correlation<R: Rng + ?Sized>(
    xs: &[f64],
    ys: &[f64],
    options: &BootstrapOptions,
    rng: &mut R,
) -> CorrelationResult {
    let n = xs.len();
    if n != ys.len() || n < options.min_samples || n == 0 || options.iterations == 0 {
        return CorrelationResult::degenerate();
    }

    let mut sample_x = vec![0.0; n];
    let mut sample_y = vec![0.0; n];
    let mut correlations = Vec::with_capacity(options.iterations);
    for _ in 0..options.iterations {
        for slot in 0..n {
            let idx = rng.gen_range(0..n);
            sample_x[slot] = xs[idx];
            sample_y[slot] = ys[idx];
        }
        correlations.push(pearson(&sample_x, &sample_y));
    }
    correlations.sort_by(f64::total_cmp);

    match sorted_quartiles(&correlations) {
        Some(summary) => CorrelationResult {
            median: summary.median,
            q1: summary.q1,
            q3: summary.q3,
            min: summary.min,
            max: summary.max,
            sample_correlations: correlations,
        },
        None => CorrelationResult::degenerate(),
    }
}

/// Bootstrap correlation box for every model, in first-occurrence order.
pub fn model_correlations<T, R>(
    records: &[T],
    x: impl Fn(&T) -> f64,
    y: impl Fn(&T) -> f64,
    options: &BootstrapOptions,
    rng: &mut R,
) -> Vec<ModelCorrelation>
where
    T: ModelSample,
    R: Rng + ?Sized,
{
    group_by_model(records)
        .into_iter()
        .map(|group| {
            let xs = group.values(&x);
            let ys = group.values(&y);
            if group.len() < options.min_samples {
                debug!(
                    "model {} has {} samples, reporting neutral correlation",
                    group.key,
                    group.len()
                );
            }
            ModelCorrelation {
                samples: group.len(),
                result: bootstrap_correlation(&xs, &ys, options, rng),
                model: group.key,
            }
        })
        .collect()
}

/// Metric pairs correlated on batch dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchCorrelation {
    EnergyConfidence,
    EnergyInference,
}

impl BatchCorrelation {
    pub fn pair(self, record: &BatchRecord) -> (f64, f64) {
        match self {
            BatchCorrelation::EnergyConfidence => (record.energy_usage, record.mean_confidence),
            BatchCorrelation::EnergyInference => (record.energy_usage, record.mean_inference),
        }
    }

    pub fn per_model<R: Rng + ?Sized>(
        self,
        records: &[BatchRecord],
        options: &BootstrapOptions,
        rng: &mut R,
    ) -> Vec<ModelCorrelation> {
        model_correlations(
            records,
            |r| self.pair(r).0,
            |r| self.pair(r).1,
            options,
            rng,
        )
    }
}
