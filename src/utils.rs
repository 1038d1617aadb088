//! Small numeric helpers used when turning leaves into outcomes.

/// Sums a leaf's `[output][class]` counts across outputs into one per-class vector.
///
/// The result is as long as the longest output row; a leaf with no outputs
/// yields an empty vector.
pub fn aggregate_outputs(values: &[Vec<f64>]) -> Vec<f64> {
    let width = values.iter().map(Vec::len).max().unwrap_or(0);
    let mut totals = vec![0.0; width];
    for row in values {
        for (total, &count) in totals.iter_mut().zip(row) {
            *total += count;
        }
    }
    totals
}

/// Determines the majority class from per-class counts.
///
/// Ties are broken by choosing the class with the lower index, the same as
/// `argmax` in numpy. Returns `None` for an empty slice.
pub fn majority_class(counts: &[f64]) -> Option<usize> {
    let mut winner: Option<(usize, f64)> = None;
    for (index, &count) in counts.iter().enumerate() {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((index, count)),
        }
    }
    winner.map(|(index, _)| index)
}

/// Share of `part` in `whole`, in percent.
#[inline]
pub fn percentage(part: f64, whole: f64) -> f64 {
    part / whole * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_class() {
        assert_eq!(majority_class(&[1.0, 5.0, 2.0]), Some(1));
        // Tie-breaking check: index 0 and 2 both have 5, lower index wins.
        assert_eq!(majority_class(&[5.0, 1.0, 5.0]), Some(0));
        assert_eq!(majority_class(&[1.0, 1.0, 1.0]), Some(0));
        assert_eq!(majority_class(&[0.0, 0.0, 1.0]), Some(2));
        assert_eq!(majority_class(&[3.0, 9.0, 9.0]), Some(1));
        assert_eq!(majority_class(&[]), None);
    }

    #[test]
    fn test_aggregate_outputs() {
        assert_eq!(aggregate_outputs(&[vec![1.0, 2.0]]), vec![1.0, 2.0]);
        assert_eq!(
            aggregate_outputs(&[vec![1.0, 2.0], vec![3.0, 4.0]]),
            vec![4.0, 6.0]
        );
        // Ragged outputs pad with zero.
        assert_eq!(aggregate_outputs(&[vec![1.0], vec![3.0, 4.0]]), vec![4.0, 4.0]);
        assert!(aggregate_outputs(&[]).is_empty());
    }

    #[test]
    fn test_percentage() {
        assert!((percentage(10.0, 30.0) - 33.333333).abs() < 1e-5);
        assert_eq!(percentage(30.0, 30.0), 100.0);
    }
}
