//! NaN-aware error and skill statistics for paired forecast/reference values.
//!
//! Every function here treats a non-finite value (NaN, ±inf) as a missing
//! cell: a pair contributes only when both sides are finite. Results that
//! have no valid input are `None`, never `0.0`.

/// Pairs `(x[i], y[i])` where both values are finite.
///
/// Extra trailing elements of the longer slice are ignored.
pub fn finite_pairs(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y.iter())
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(xi, yi)| (*xi, *yi))
        .collect()
}

/// Arithmetic mean of the finite values. Returns `None` if there are none.
pub fn nan_mean(data: &[f64]) -> Option<f64> {
    let (sum, n) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}

/// Root-mean-square error over the finite pairs.
///
/// Returns `None` when no pair has two finite values.
pub fn rmse(x: &[f64], y: &[f64]) -> Option<f64> {
    let (sum_sq, n) = x
        .iter()
        .zip(y.iter())
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .fold((0.0, 0usize), |(s, n), (xi, yi)| {
            let d = xi - yi;
            (s + d * d, n + 1)
        });
    if n == 0 {
        return None;
    }
    Some((sum_sq / n as f64).sqrt())
}

/// Pearson correlation coefficient.
///
/// Filters to indices where both `x[i]` and `y[i]` are finite.
/// Returns `None` if fewer than 2 finite pairs or if either series has zero
/// variance (the coefficient is undefined for constant input). The result
/// is clamped to `[-1, 1]` against rounding.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    let pairs = finite_pairs(x, y);

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mx: f64 = pairs.iter().map(|(xi, _)| xi).sum::<f64>() / n;
    let my: f64 = pairs.iter().map(|(_, yi)| yi).sum::<f64>() / n;

    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for &(xi, yi) in &pairs {
        let dx = xi - mx;
        let dy = yi - my;
        sum_xy += dx * dy;
        sum_xx += dx * dx;
        sum_yy += dy * dy;
    }

    let denom = (sum_xx * sum_yy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    Some((sum_xy / denom).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_finite_pairs_drops_either_side() {
        let x = [1.0, f64::NAN, 3.0, f64::INFINITY];
        let y = [2.0, 4.0, f64::NAN, 8.0];
        assert_eq!(finite_pairs(&x, &y), vec![(1.0, 2.0)]);
    }

    #[test]
    fn test_nan_mean() {
        assert_relative_eq!(nan_mean(&[1.0, f64::NAN, 3.0]).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_mean_all_missing() {
        assert!(nan_mean(&[f64::NAN, f64::NAN]).is_none());
        assert!(nan_mean(&[]).is_none());
    }

    #[test]
    fn test_rmse_constant_offset() {
        let a = [12.0; 4];
        let b = [10.0; 4];
        assert_relative_eq!(rmse(&a, &b).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rmse_self_is_zero() {
        let a = [1.5, -2.0, 3.25, 7.0];
        assert_eq!(rmse(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn test_rmse_non_negative() {
        let a = [1.0, -4.0, 9.0, 0.5];
        let b = [-3.0, 2.0, 1.0, 0.25];
        assert!(rmse(&a, &b).unwrap() >= 0.0);
    }

    #[test]
    fn test_rmse_excludes_nan_cells() {
        let a = [1.0, f64::NAN, 3.0];
        let b = [2.0, 100.0, 5.0];
        // (1 + 4) / 2 = 2.5
        assert_relative_eq!(rmse(&a, &b).unwrap(), 2.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_rmse_all_nan_is_undefined() {
        let a = [f64::NAN; 3];
        let b = [1.0; 3];
        assert!(rmse(&a, &b).is_none());
    }

    #[test]
    fn test_pearson_correlation_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        let r = pearson_correlation(&x, &y);
        assert_relative_eq!(r.unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_correlation_anti() {
        let x = [1.0, 2.0, 3.0];
        let y = [3.0, 2.0, 1.0];
        assert_relative_eq!(pearson_correlation(&x, &y).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_correlation_two_pairs() {
        let x = [1.0, 2.0];
        let y = [3.0, 5.0];
        assert_relative_eq!(pearson_correlation(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_correlation_insufficient() {
        assert!(pearson_correlation(&[1.0], &[3.0]).is_none());
        assert!(pearson_correlation(&[1.0, f64::NAN], &[3.0, 4.0]).is_none());
    }

    #[test]
    fn test_pearson_correlation_constant_is_undefined() {
        let x = [12.0; 4];
        let y = [10.0; 4];
        assert!(pearson_correlation(&x, &y).is_none());
    }

    #[test]
    fn test_pearson_correlation_with_nan() {
        let x = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, f64::NAN, 8.0, 10.0];
        // Finite pairs: (1,2), (4,8), (5,10): perfect linear
        let r = pearson_correlation(&x, &y);
        assert_relative_eq!(r.unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pearson_correlation_bounded() {
        let x = [0.3, 1.7, -2.2, 4.1, 0.0, 9.9];
        let y = [1.1, -0.4, 2.8, 0.2, -1.5, 3.3];
        let r = pearson_correlation(&x, &y).unwrap();
        assert!((-1.0..=1.0).contains(&r));
    }
}
