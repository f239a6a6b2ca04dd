//! Descriptive statistics used by the analysis artifacts.

use std::f64::consts::PI;

/// Default bin count for distribution histograms.
pub const HISTOGRAM_BINS: usize = 30;
/// Whisker reach in multiples of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Quantile of sorted data with linear interpolation between ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest observation within `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest observation within `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR * iqr;
    let high_fence = q3 + WHISKER_IQR * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= low_fence && *v <= high_fence)
        .collect();
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < low_fence || *v > high_fence)
        .collect();

    Some(BoxStats {
        count: sorted.len(),
        q1,
        median,
        q3,
        lower_whisker: inside.first().copied().unwrap_or(q1),
        upper_whisker: inside.last().copied().unwrap_or(q3),
        outliers,
    })
}

/// Equal-width histogram; `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }
}

/// Bin `values` into `bins` equal-width bins spanning their range. The last
/// bin is closed on the right; a degenerate range is widened by 0.5 each way.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if values.is_empty() || bins == 0 {
        return None;
    }
    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let edges = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0_u64; bins];
    for value in values {
        let idx = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }
    Some(Histogram { edges, counts })
}

/// Gaussian kernel density estimate evaluated at `points` evenly spaced
/// positions over the data range, with Scott's rule bandwidth. Returns
/// `None` for fewer than two values or zero variance.
pub fn gaussian_kde(values: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    let std = sample_std(values)?;
    if std == 0.0 || points < 2 {
        return None;
    }
    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

    let curve = (0..points)
        .map(|i| {
            let x = min + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect();
    Some(curve)
}

/// Pearson correlation of paired samples; NaN when undefined (fewer than
/// two pairs or a zero-variance side).
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return f64::NAN;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let divisor = (var_x * var_y).sqrt();
    if divisor == 0.0 {
        return f64::NAN;
    }
    (cov / divisor).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!(close(quantile(&sorted, 0.25).unwrap(), 1.75));
        assert!(close(quantile(&sorted, 0.5).unwrap(), 2.5));
        assert!(close(quantile(&sorted, 0.75).unwrap(), 3.25));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn box_stats_separate_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let stats = box_stats(&values).unwrap();
        assert!(close(stats.median, 5.0));
        assert!(close(stats.q1, 3.0));
        assert!(close(stats.q3, 7.0));
        assert!(close(stats.lower_whisker, 1.0));
        assert!(close(stats.upper_whisker, 8.0));
        assert_eq!(stats.outliers, vec![100.0]);
        assert_eq!(stats.count, 9);
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values: Vec<f64> = (1..=90).map(f64::from).collect();
        let hist = histogram(&values, HISTOGRAM_BINS).unwrap();
        assert_eq!(hist.counts.len(), 30);
        assert_eq!(hist.edges.len(), 31);
        assert_eq!(hist.counts.iter().sum::<u64>(), 90);
        assert!(close(hist.edges[0], 1.0));
        assert!(close(hist.edges[30], 90.0));
        assert_eq!(hist.counts[29], 3);
    }

    #[test]
    fn histogram_widens_constant_data() {
        let hist = histogram(&[4.0, 4.0, 4.0], 2).unwrap();
        assert_eq!(hist.edges, vec![3.5, 4.0, 4.5]);
        assert_eq!(hist.counts, vec![0, 3]);
    }

    #[test]
    fn kde_integrates_to_roughly_one() {
        let values: Vec<f64> = (0..200).map(|i| f64::from(i % 50)).collect();
        let curve = gaussian_kde(&values, 400).unwrap();
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        // The grid stops at the data range, so a little mass falls outside.
        assert!(area > 0.85 && area < 1.01, "area {area}");
        assert!(gaussian_kde(&[3.0, 3.0, 3.0], 10).is_none());
    }

    #[test]
    fn pearson_matches_known_values() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(close(pearson(&xs, &[2.0, 4.0, 6.0, 8.0, 10.0]), 1.0));
        assert!(close(pearson(&xs, &[5.0, 4.0, 3.0, 2.0, 1.0]), -1.0));
        assert!(close(pearson(&xs, &[2.0, 1.0, 4.0, 3.0, 5.0]), 0.8));
        assert!(pearson(&xs, &[1.0; 5]).is_nan());
        assert!(pearson(&[1.0], &[1.0]).is_nan());
    }

    #[test]
    fn rounds_to_two_places() {
        assert!(close(round2(10.4567), 10.46));
        assert!(close(round2(3.0), 3.0));
    }
}
