use std::collections::BTreeMap;

/// Sum of the defined entries of a column.
pub fn column_sum<K>(column: &BTreeMap<K, Option<f64>>) -> f64 {
    column.values().flatten().sum()
}

/// Divides every defined entry by the column sum. A zero sum yields an
/// all-undefined column rather than a division by zero.
pub fn normalized_column<K: Ord + Clone>(
    column: &BTreeMap<K, Option<f64>>,
) -> BTreeMap<K, Option<f64>> {
    let total = column_sum(column);
    column
        .iter()
        .map(|(key, value)| {
            let normalized = if total > 0.0 {
                value.map(|v| v / total)
            } else {
                None
            };
            (key.clone(), normalized)
        })
        .collect()
}

/// Key of the largest defined entry; ties resolve to the first key in order.
pub fn argmax<K: Ord + Copy>(column: &BTreeMap<K, Option<f64>>) -> Option<K> {
    let mut best: Option<(K, f64)> = None;
    for (key, value) in column {
        let Some(value) = *value else {
            continue;
        };
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((*key, value)),
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_defined_entries() {
        let column: BTreeMap<u8, Option<f64>> =
            [(1, Some(1.0)), (2, Some(3.0)), (3, None)].into_iter().collect();
        let normalized = normalized_column(&column);
        assert_eq!(normalized[&1], Some(0.25));
        assert_eq!(normalized[&2], Some(0.75));
        assert_eq!(normalized[&3], None);
    }

    #[test]
    fn zero_sum_has_no_signal() {
        let column: BTreeMap<u8, Option<f64>> = [(1, Some(0.0)), (2, None)].into_iter().collect();
        assert!(normalized_column(&column).values().all(Option::is_none));
        assert_eq!(argmax(&normalized_column(&column)), None);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        let column: BTreeMap<u8, Option<f64>> =
            [(1, Some(0.5)), (2, Some(0.9)), (3, Some(0.9))].into_iter().collect();
        assert_eq!(argmax(&column), Some(2));
    }
}
