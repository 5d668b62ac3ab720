use sage_types::{
    records::{LlmRecord, ModelSample},
    series::ScatterPoint,
};

/// Pairs every record into an `{x, y, model, id}` point, `id` being the row index.
pub fn scatter<T: ModelSample>(
    records: &[T],
    x: impl Fn(&T) -> f64,
    y: impl Fn(&T) -> f64,
) -> Vec<ScatterPoint> {
    records
        .iter()
        .enumerate()
        .map(|(id, record)| ScatterPoint {
            x: x(record),
            y: y(record),
            model: record.model_name().to_string(),
            id,
        })
        .collect()
}

/// Scatter views over LLM telemetry. Fractional metrics are shown as percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmScatter {
    EnergyVsEwma,
    OutputTokensVsEnergy,
    OutputTokensVsEwma,
    CpuVsEnergy,
}

impl LlmScatter {
    pub const ALL: [LlmScatter; 4] = [
        LlmScatter::EnergyVsEwma,
        LlmScatter::OutputTokensVsEnergy,
        LlmScatter::OutputTokensVsEwma,
        LlmScatter::CpuVsEnergy,
    ];

    pub fn axes(self, record: &LlmRecord) -> (f64, f64) {
        match self {
            LlmScatter::EnergyVsEwma => (record.energy_usage * 100.0, record.ewma_score * 100.0),
            LlmScatter::OutputTokensVsEnergy => {
                (record.output_token_size, record.energy_usage * 100.0)
            }
            LlmScatter::OutputTokensVsEwma => (record.output_token_size, record.ewma_score * 100.0),
            LlmScatter::CpuVsEnergy => (record.cpu_usage * 100.0, record.energy_usage * 100.0),
        }
    }

    pub fn series(self, records: &[LlmRecord]) -> Vec<ScatterPoint> {
        scatter(records, |r| self.axes(r).0, |r| self.axes(r).1)
    }
}
