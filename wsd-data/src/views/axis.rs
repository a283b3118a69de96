//! Y-axis scaling shared by the line charts.

/// Fraction of the data span added above and below the series.
pub const PADDING: f64 = 0.15;

/// `[max(0, min − 0.15Δ), max + 0.15Δ]` over the given values, Δ = max − min.
///
/// Missing values are skipped; `None` when nothing is left.
pub fn y_range<I>(values: I) -> Option<[f64; 2]>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut bounds: Option<(f64, f64)> = None;
    for v in values.into_iter().flatten() {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    let (min, max) = bounds?;
    let pad = (max - min) * PADDING;
    Some([(min - pad).max(0.0), max + pad])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_fifteen_percent_each_side() {
        let [lo, hi] = y_range([Some(10.0), Some(20.0), None]).unwrap();
        assert!((lo - 8.5).abs() < 1e-12);
        assert!((hi - 21.5).abs() < 1e-12);
    }

    #[test]
    fn lower_bound_is_floored_at_zero() {
        assert_eq!(y_range([Some(0.1), Some(4.1)]).unwrap()[0], 0.0);
    }

    #[test]
    fn single_value_has_zero_span() {
        assert_eq!(y_range([Some(2.5)]), Some([2.5, 2.5]));
    }

    #[test]
    fn no_values_no_range() {
        assert_eq!(y_range([None, None]), None);
        assert_eq!(y_range(Vec::<Option<f64>>::new()), None);
    }
}
