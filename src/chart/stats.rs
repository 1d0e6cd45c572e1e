//! Numeric helpers behind the distribution chart.

/// One histogram bin. `end` is exclusive except for the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width histogram over the observed range of `values`.
///
/// A single distinct value gets the range `value ± 0.5`.
/// Non-finite values are skipped; no values means no bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (mut lo, mut hi) = min_max(&finite);
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in &finite {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: lo + i as f64 * width,
            end: lo + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Smallest and largest value. Caller guarantees a non-empty slice.
pub fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(var.sqrt())
}

/// Gaussian kernel density estimate with Scott's rule bandwidth, evaluated on
/// `points` evenly spaced positions between the smallest and largest value.
///
/// Returns `[x, density]` pairs; empty when fewer than two values or zero variance.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<[f64; 2]> {
    let std = match sample_std(values) {
        Some(s) if s > f64::EPSILON => s,
        _ => return Vec::new(),
    };
    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    let (lo, hi) = min_max(values);
    let points = points.max(2);
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum();
            [x, density * norm]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [8.0, 8.1, 8.5, 8.5, 9.0, 9.3];
        let bins = histogram(&values, 20);
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert!((bins[0].start - 8.0).abs() < 1e-12);
        assert!((bins[19].end - 9.3).abs() < 1e-9);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let bins = histogram(&[0.0, 10.0], 4);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[3].count, 1);
    }

    #[test]
    fn single_value_gets_unit_range() {
        let bins = histogram(&[8.5, 8.5], 10);
        assert_eq!(bins.len(), 10);
        assert!((bins[0].start - 8.0).abs() < 1e-12);
        assert!((bins[9].end - 9.0).abs() < 1e-12);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!((bins[0].width() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn no_values_no_bins() {
        assert!(histogram(&[], 20).is_empty());
        assert!(histogram(&[f64::NAN], 20).is_empty());
    }

    #[test]
    fn kde_needs_spread() {
        assert!(gaussian_kde(&[], 50).is_empty());
        assert!(gaussian_kde(&[8.0], 50).is_empty());
        assert!(gaussian_kde(&[8.0, 8.0, 8.0], 50).is_empty());
    }

    #[test]
    fn kde_spans_sample_range_and_peaks_at_centre() {
        let values = [8.0, 8.2, 8.4, 8.6, 8.8, 9.0];
        let curve = gaussian_kde(&values, 200);
        assert_eq!(curve.len(), 200);
        assert!((curve[0][0] - 8.0).abs() < 1e-12);
        assert!((curve[199][0] - 9.0).abs() < 1e-9);
        assert!(curve.iter().all(|p| p[1] > 0.0));
        // Peak sits near the centre of a symmetric sample.
        let peak = curve
            .iter()
            .max_by(|a, b| a[1].total_cmp(&b[1]))
            .unwrap();
        assert!((peak[0] - 8.5).abs() < 0.1);
    }

    #[test]
    fn sample_std_matches_hand_computation() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((std - 2.138089935).abs() < 1e-6);
        assert!(sample_std(&[1.0]).is_none());
    }
}
