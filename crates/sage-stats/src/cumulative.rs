use chrono::{DateTime, Utc};
use sage_types::{
    records::{BatchRecord, LlmRecord, ModelSample, VisionRecord},
    series::CumulativePoint,
};

/// Running sum of `value` over records ordered by `key`.
///
/// The sort is stable, so records with equal keys keep their input order.
pub fn cumulative_series<T, K>(
    records: &[T],
    key: impl Fn(&T) -> K,
    value: impl Fn(&T) -> f64,
) -> Vec<CumulativePoint<K>>
where
    T: ModelSample,
    K: Ord,
{
    let mut ordered: Vec<(K, &T)> = records.iter().map(|record| (key(record), record)).collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let mut running = 0.0;
    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, (key, record))| {
            let amount = value(record);
            running += amount;
            CumulativePoint {
                index: idx + 1,
                key,
                value: amount,
                cumulative_value: running,
                model: record.model_name().to_string(),
            }
        })
        .collect()
}

pub fn batch_energy_by_id(records: &[BatchRecord]) -> Vec<CumulativePoint<u64>> {
    cumulative_series(records, |r| r.id, |r| r.energy_usage)
}

pub fn vision_cpu_by_time(records: &[VisionRecord]) -> Vec<CumulativePoint<Option<DateTime<Utc>>>> {
    cumulative_series(records, |r| r.instant(), |r| r.cpu_usage)
}

pub fn vision_battery_by_time(
    records: &[VisionRecord],
) -> Vec<CumulativePoint<Option<DateTime<Utc>>>> {
    cumulative_series(records, |r| r.instant(), |r| r.battery_consumption)
}

pub fn llm_energy_by_time(records: &[LlmRecord]) -> Vec<CumulativePoint<Option<DateTime<Utc>>>> {
    cumulative_series(records, |r| r.instant(), |r| r.energy_usage)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(id: u64, energy: f64) -> BatchRecord {
        BatchRecord {
            id,
            model_name: "A".into(),
            energy_usage: energy,
            mean_confidence: 0.5,
            mean_inference: 10.0,
            energy_per_confidence: energy / 0.5,
            timestamp: None,
        }
    }

    #[test]
    fn energy_accumulates_in_id_order() {
        let series = batch_energy_by_id(&[batch(2, 4.0), batch(1, 2.0)]);
        let sums: Vec<_> = series.iter().map(|p| p.cumulative_value).collect();
        assert_eq!(sums, [2.0, 6.0]);
        assert_eq!(series[0].key, 1);
        assert_eq!(series[1].index, 2);
    }

    #[test]
    fn non_negative_values_never_decrease() {
        let records: Vec<_> = [3.0, 0.0, 1.5, 0.25, 7.0, 0.0]
            .iter()
            .enumerate()
            .map(|(i, e)| batch((10 - i) as u64, *e))
            .collect();
        let series = batch_energy_by_id(&records);
        assert!(series
            .windows(2)
            .all(|w| w[0].cumulative_value <= w[1].cumulative_value));
    }

    #[test]
    fn vision_series_sorted_by_timestamp() {
        let record = |ts: &str, cpu: f64| VisionRecord {
            timestamp: ts.into(),
            battery_level: 90.0,
            cpu_usage: cpu,
            battery_consumption: cpu / 10.0,
            selected_model: "m".into(),
            instantaneous_confidence: 80.0,
            average_confidence: 80.0,
            current_total_predictions: 1.0,
            inference_time: 0.0,
        };
        let records = vec![
            record("2024-05-01T10:00:10Z", 30.0),
            record("2024-05-01T10:00:00Z", 10.0),
        ];
        let cpu = vision_cpu_by_time(&records);
        let sums: Vec<_> = cpu.iter().map(|p| p.cumulative_value).collect();
        assert_eq!(sums, [10.0, 40.0]);
        let battery = vision_battery_by_time(&records);
        assert_eq!(battery[1].cumulative_value, 4.0);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(batch_energy_by_id(&[]).is_empty());
    }
}
