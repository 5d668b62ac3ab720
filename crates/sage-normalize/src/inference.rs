use chrono::{DateTime, Utc};
use sage_types::{config::InferenceOrdering, records::VisionRecord, time::seconds_between};

/// Attaches the time since the previous sample to every vision record.
///
/// `instants[i]` is the instant read from the source row of `records[i]`, so rows whose
/// timestamp was missing or defaulted pass `None`. Records are ranked by instant with a
/// stable sort; unknown instants rank first and contribute a zero delta. The earliest
/// record gets 0.
pub fn derive_inference_times(
    mut records: Vec<VisionRecord>,
    instants: &[Option<DateTime<Utc>>],
    ordering: InferenceOrdering,
) -> Vec<VisionRecord> {
    let instant = |idx: usize| instants.get(idx).copied().flatten();
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&idx| instant(idx));

    let mut previous = None;
    for (position, &idx) in order.iter().enumerate() {
        records[idx].inference_time = if position == 0 {
            0.0
        } else {
            seconds_between(previous, instant(idx))
        };
        previous = instant(idx);
    }

    match ordering {
        InferenceOrdering::InputOrder => records,
        InferenceOrdering::SortedByTimestamp => {
            let mut slots: Vec<Option<VisionRecord>> = records.into_iter().map(Some).collect();
            order
                .into_iter()
                .filter_map(|idx| slots[idx].take())
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_types::records::ModelSample;

    fn derive(records: Vec<VisionRecord>, ordering: InferenceOrdering) -> Vec<VisionRecord> {
        let instants: Vec<_> = records.iter().map(|record| record.instant()).collect();
        derive_inference_times(records, &instants, ordering)
    }

    fn record(ts: &str, model: &str) -> VisionRecord {
        VisionRecord {
            timestamp: ts.into(),
            battery_level: 90.0,
            cpu_usage: 20.0,
            battery_consumption: 0.5,
            selected_model: model.into(),
            instantaneous_confidence: 80.0,
            average_confidence: 75.0,
            current_total_predictions: 1.0,
            inference_time: 42.0,
        }
    }

    fn input() -> Vec<VisionRecord> {
        vec![
            record("2024-05-01T10:00:05Z", "c"),
            record("2024-05-01T10:00:00Z", "a"),
            record("2024-05-01T10:00:01.500Z", "b"),
        ]
    }

    #[test]
    fn sorted_ordering_emits_timestamp_order() {
        let out = derive(input(), InferenceOrdering::SortedByTimestamp);
        let models: Vec<_> = out.iter().map(|r| r.selected_model.as_str()).collect();
        assert_eq!(models, ["a", "b", "c"]);
        let times: Vec<_> = out.iter().map(|r| r.inference_time).collect();
        assert_eq!(times, [0.0, 1.5, 3.5]);
    }

    #[test]
    fn input_ordering_attaches_by_identity() {
        let out = derive(input(), InferenceOrdering::InputOrder);
        let models: Vec<_> = out.iter().map(|r| r.selected_model.as_str()).collect();
        assert_eq!(models, ["c", "a", "b"]);
        let times: Vec<_> = out.iter().map(|r| r.inference_time).collect();
        assert_eq!(times, [3.5, 0.0, 1.5]);
    }

    #[test]
    fn unknown_timestamps_yield_zero_delta() {
        let records = vec![
            record("2024-05-01T10:00:03Z", "b"),
            record("not a time", "a"),
            record("2024-05-01T10:00:04Z", "c"),
        ];
        let out = derive(records, InferenceOrdering::SortedByTimestamp);
        let models: Vec<_> = out.iter().map(|r| r.selected_model.as_str()).collect();
        assert_eq!(models, ["a", "b", "c"]);
        let times: Vec<_> = out.iter().map(|r| r.inference_time).collect();
        assert_eq!(times, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(derive(Vec::new(), InferenceOrdering::InputOrder).is_empty());
        let out = derive(
            vec![record("2024-05-01T10:00:00Z", "a")],
            InferenceOrdering::SortedByTimestamp,
        );
        assert_eq!(out[0].inference_time, 0.0);
    }

    #[test]
    fn missing_instant_does_not_use_record_timestamp() {
        let records = vec![
            record("2024-05-01T10:00:00Z", "a"),
            record("2024-05-01T10:00:01Z", "b"),
            record("2030-01-01T00:00:00Z", "c"),
        ];
        let instants: Vec<_> = records[..2]
            .iter()
            .map(|record| record.instant())
            .chain([None])
            .collect();
        let out = derive_inference_times(records, &instants, InferenceOrdering::SortedByTimestamp);
        let models: Vec<_> = out.iter().map(|r| r.selected_model.as_str()).collect();
        assert_eq!(models, ["c", "a", "b"]);
        let times: Vec<_> = out.iter().map(|r| r.inference_time).collect();
        assert_eq!(times, [0.0, 0.0, 1.0]);
    }
}
