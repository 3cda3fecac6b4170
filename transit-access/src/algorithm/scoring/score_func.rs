use super::smooth_saturation;
use crate::model::AccessError;

/// log-normalizes `x` onto `[0, 1]` with `log(x/min) / log(max/min)` and
/// smoothly saturates the result. frequency and distance are both roughly
/// log-distributed, so `min` and `max` describe negligible and best-possible
/// service on a multiplicative scale.
///
/// # Errors
///
/// [`AccessError::DomainError`] when `x` is zero, negative or not finite.
/// callers floor degenerate inputs before calling.
pub fn score_func(x: f64, min: f64, max: f64, alpha: f64) -> Result<f64, AccessError> {
    if !(min > 0.0 && max > min && min.is_finite() && max.is_finite()) {
        return Err(AccessError::InvalidParameter(format!(
            "normalization range must satisfy 0 < min < max, found [{min}, {max}]"
        )));
    }
    if !(x > 0.0 && x.is_finite()) {
        return Err(AccessError::DomainError { value: x, min, max });
    }
    let normalized = (x / min).ln() / (max / min).ln();
    Ok(smooth_saturation(normalized, alpha, 0.0, 1.0))
}

/// geometric mean of the frequency and proximity scores scaled to
/// `[0, score_max]`. either factor at zero drives the composite to zero.
pub fn composite_score(score_h: f64, score_d: f64, score_max: f64) -> f64 {
    score_max * (score_h * score_d).max(0.0).sqrt()
}

#[cfg(test)]
mod test {
    use super::{composite_score, score_func};
    use crate::algorithm::scoring::DEFAULT_ALPHA;
    use crate::model::AccessError;

    #[test]
    fn test_increasing_and_bounded_inside_range() {
        let (min, max) = (0.5, 144.0);
        let mut previous = f64::NEG_INFINITY;
        let mut x = 0.51;
        while x < max {
            let s = score_func(x, min, max, DEFAULT_ALPHA).expect("in domain");
            assert!((0.0..=1.0).contains(&s), "x {x} -> {s}");
            assert!(s > previous, "x {x}: {s} <= {previous}");
            previous = s;
            x *= 1.1;
        }
    }

    #[test]
    fn test_saturates_outside_range() {
        let low = score_func(0.01, 40.0, 2400.0, DEFAULT_ALPHA).expect("in domain");
        let high = score_func(1e7, 40.0, 2400.0, DEFAULT_ALPHA).expect("in domain");
        assert!(low >= 0.0 && low < 0.01, "{low}");
        assert!(high <= 1.0 && high > 0.99, "{high}");
    }

    #[test]
    fn test_non_positive_input_is_domain_error() {
        for x in [0.0, -3.0, f64::NAN] {
            match score_func(x, 1.0, 100.0, DEFAULT_ALPHA) {
                Err(AccessError::DomainError { .. }) => {}
                other => panic!("expected domain error for {x}, found {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_range_rejected() {
        assert!(score_func(5.0, 0.0, 100.0, DEFAULT_ALPHA).is_err());
        assert!(score_func(5.0, 10.0, 10.0, DEFAULT_ALPHA).is_err());
    }

    #[test]
    fn test_composite_scales_with_both_factors() {
        let base = composite_score(0.2, 0.3, 10.0);
        let doubled = composite_score(0.4, 0.6, 10.0);
        assert!((doubled - 2.0 * base).abs() < 1e-12);
    }

    #[test]
    fn test_composite_zero_factor() {
        assert_eq!(composite_score(0.0, 0.9, 10.0), 0.0);
        assert_eq!(composite_score(1.0, 1.0, 10.0), 10.0);
    }
}
