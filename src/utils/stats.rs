//! Statistical utility functions.

use serde::Serialize;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (n denominator).
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Mean of the present values, `None` when every value is missing.
pub fn masked_mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        None
    } else {
        Some(mean(&present))
    }
}

/// Sum of the present values, `None` when every value is missing.
pub fn masked_sum(values: &[Option<f64>]) -> Option<f64> {
    let mut present = values.iter().flatten().peekable();
    present.peek()?;
    Some(present.sum())
}

/// Minimum and maximum of finite values.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Percentile with linear interpolation between closest ranks.
///
/// `q` is in percent (0 to 100).
pub fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let pos = (q / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    if lower == upper || upper >= n {
        sorted[lower.min(n - 1)]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` entries.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Equal-width 2-D histogram; `counts[x_bin][y_bin]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram2d {
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
    pub counts: Vec<Vec<usize>>,
}

fn bin_edges(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let width = (hi - lo) / bins as f64;
    (0..=bins).map(|i| lo + width * i as f64).collect()
}

fn bin_index(edges: &[f64], value: f64) -> usize {
    let bins = edges.len() - 1;
    let lo = edges[0];
    let width = (edges[bins] - lo) / bins as f64;
    // Last bin is closed on the right.
    (((value - lo) / width) as usize).min(bins - 1)
}

/// Histogram of finite values into `bins` equal-width bins.
///
/// Returns `None` for zero bins or when no finite value is present.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let (lo, hi) = min_max(values)?;
    let edges = bin_edges(lo, hi, bins);

    let mut counts = vec![0; bins];
    for &v in values.iter().filter(|v| v.is_finite()) {
        counts[bin_index(&edges, v)] += 1;
    }

    Some(Histogram { edges, counts })
}

/// 2-D histogram over pairs where both coordinates are finite.
pub fn histogram2d(xs: &[f64], ys: &[f64], bins: usize) -> Option<Histogram2d> {
    if bins == 0 {
        return None;
    }
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();

    let (x_lo, x_hi) = min_max(&pairs.iter().map(|p| p.0).collect::<Vec<_>>())?;
    let (y_lo, y_hi) = min_max(&pairs.iter().map(|p| p.1).collect::<Vec<_>>())?;
    let x_edges = bin_edges(x_lo, x_hi, bins);
    let y_edges = bin_edges(y_lo, y_hi, bins);

    let mut counts = vec![vec![0; bins]; bins];
    for (x, y) in pairs {
        counts[bin_index(&x_edges, x)][bin_index(&y_edges, y)] += 1;
    }

    Some(Histogram2d {
        x_edges,
        y_edges,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0, epsilon = 1e-12);
        assert_relative_eq!(population_std(&values), 2.0, epsilon = 1e-12);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn masked_helpers_ignore_missing() {
        let values = [Some(1.0), None, Some(3.0)];
        assert_eq!(masked_mean(&values), Some(2.0));
        assert_eq!(masked_sum(&values), Some(4.0));
        assert_eq!(masked_mean(&[None, None]), None);
        assert_eq!(masked_sum(&[None]), None);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(percentile(&values, 50.0), 3.0, epsilon = 1e-12);
        assert_relative_eq!(percentile(&values, 25.0), 2.0, epsilon = 1e-12);
        assert_relative_eq!(percentile(&values, 95.0), 4.8, epsilon = 1e-12);
        assert_relative_eq!(percentile(&values, 100.0), 5.0, epsilon = 1e-12);
        assert!(percentile(&[], 50.0).is_nan());
    }

    #[test]
    fn histogram_counts_every_finite_value() {
        let values = [0.0, 0.5, 1.0, 1.5, 2.0, f64::NAN];
        let hist = histogram(&values, 4).unwrap();

        assert_eq!(hist.edges.len(), 5);
        assert_eq!(hist.counts.iter().sum::<usize>(), 5);
        // max lands in the last bin
        assert_eq!(hist.counts[3], 2);
    }

    #[test]
    fn histogram_of_constant_values_uses_unit_span() {
        let hist = histogram(&[3.0, 3.0, 3.0], 2).unwrap();
        assert_relative_eq!(hist.edges[0], 2.5, epsilon = 1e-12);
        assert_relative_eq!(hist.edges[2], 3.5, epsilon = 1e-12);
        assert_eq!(hist.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn histogram2d_bins_pairs() {
        let xs = [0.0, 1.0, 0.0, 1.0];
        let ys = [0.0, 0.0, 1.0, 1.0];
        let hist = histogram2d(&xs, &ys, 2).unwrap();

        assert_eq!(hist.counts, vec![vec![1, 1], vec![1, 1]]);
        assert!(histogram2d(&[], &[], 2).is_none());
        assert!(histogram(&xs, 0).is_none());
    }
}
