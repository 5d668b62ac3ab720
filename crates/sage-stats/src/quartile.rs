use sage_types::{
    series::{BoxSummary, ModelBox},
    Result, SageError,
};

use crate::grouping::Groups;

/// Element at `floor(len * fraction)` of an ascending slice.
pub fn percentile_floor(sorted: &[f64], fraction: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = ((sorted.len() as f64) * fraction).floor() as usize;
    sorted.get(idx.min(sorted.len() - 1)).copied()
}

/// Box summary of an already ascending slice.
pub fn sorted_quartiles(sorted: &[f64]) -> Option<BoxSummary> {
    Some(BoxSummary {
        min: *sorted.first()?,
        q1: percentile_floor(sorted, 0.25)?,
        median: percentile_floor(sorted, 0.5)?,
        q3: percentile_floor(sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

/// Min, floor-index quartiles and max of `values`.
///
/// An empty series has no order statistics and is rejected with `EmptySeries`.
pub fn quartiles(values: &[f64]) -> Result<BoxSummary> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted_quartiles(&sorted)
        .ok_or_else(|| SageError::EmptySeries("quartiles need at least one value".into()))
}

/// One box per group, skipping groups without values.
pub fn model_boxes<T>(groups: &Groups<'_, String, T>, value: impl Fn(&T) -> f64) -> Vec<ModelBox> {
    groups
        .iter()
        .filter_map(|group| {
            let summary = quartiles(&group.values(&value)).ok()?;
            Some(ModelBox {
                model: group.key.clone(),
                summary,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by;

    #[test]
    fn floor_index_quartiles() {
        let summary = quartiles(&[7.0, 1.0, 5.0, 3.0, 9.0, 2.0, 8.0, 4.0]).expect("quartiles");
        // sorted: 1 2 3 4 5 7 8 9 -> indices 2, 4, 6
        assert_eq!(
            summary,
            BoxSummary {
                min: 1.0,
                q1: 3.0,
                median: 5.0,
                q3: 8.0,
                max: 9.0,
            }
        );
    }

    #[test]
    fn single_value_collapses() {
        let summary = quartiles(&[4.2]).expect("quartiles");
        assert_eq!(summary.min, 4.2);
        assert_eq!(summary.q1, 4.2);
        assert_eq!(summary.max, 4.2);
    }

    #[test]
    fn empty_series_is_an_error() {
        assert!(matches!(quartiles(&[]), Err(SageError::EmptySeries(_))));
    }

    #[test]
    fn quartiles_are_ordered() {
        let series = [
            vec![3.0, -1.0, 2.5, 2.5, 0.0],
            vec![10.0, 9.0],
            vec![0.1, 0.3, 0.2, 0.9, 0.5, 0.4, 0.8],
        ];
        for values in series {
            let s = quartiles(&values).expect("quartiles");
            assert!(s.min <= s.q1 && s.q1 <= s.median && s.median <= s.q3 && s.q3 <= s.max);
        }
    }

    #[test]
    fn boxes_per_group() {
        let data = [("a", 1.0), ("b", 5.0), ("a", 3.0), ("a", 2.0)];
        let groups = group_by(&data, |(model, _)| model.to_string());
        let boxes = model_boxes(&groups, |(_, v)| *v);
        assert_eq!(boxes.len(), 2);
        assert_eq!(boxes[0].model, "a");
        assert_eq!(boxes[0].summary.median, 2.0);
        assert_eq!(boxes[1].summary.max, 5.0);
    }
}
