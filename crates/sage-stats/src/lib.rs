//! Statistical transformations from typed records to chart-ready series.

pub mod aggregate;
pub mod correlation;
pub mod cumulative;
pub mod efficiency;
pub mod grouping;
pub mod quartile;
pub mod scatter;

pub use aggregate::{summarize_batch, summarize_llm, summarize_vision};
pub use correlation::{bootstrap_correlation, model_correlations, pearson, BootstrapOptions};
pub use cumulative::cumulative_series;
pub use efficiency::{efficiency, EfficiencySource};
pub use grouping::{group_by, group_by_model, model_frequency, Group, Groups};
pub use quartile::quartiles;

pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
