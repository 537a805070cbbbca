//! Statistics over per-run timings.
//!
//! Timing noise (interrupts, migrations, frequency changes) shows up as a few
//! slow runs. Samples outside the Tukey fences are dropped before the mean is
//! taken, and the coefficient of variation grades what is left.
//!
//! ```
//! use tune::stats::{DEFAULT_CV_THRESHOLD, compute_stats};
//!
//! // Seconds per run; the 0.9 s run was preempted.
//! let runs = [0.41, 0.40, 0.42, 0.41, 0.40, 0.41, 0.90];
//! let stats = compute_stats(&runs);
//!
//! assert_eq!(stats.outliers_rejected, 1);
//! assert!(stats.cv < DEFAULT_CV_THRESHOLD);
//! ```

use serde::Serialize;

/// Fewer samples than this cannot be graded.
pub const MIN_SAMPLES: usize = 5;

/// Default coefficient of variation threshold (5%).
pub const DEFAULT_CV_THRESHOLD: f64 = 0.05;

/// Tukey fence multiplier: outliers lie outside `[Q1 - k*IQR, Q3 + k*IQR]`.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Summary of one set of samples, after outlier rejection.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SampleStats {
  pub sample_count: usize,
  pub outliers_rejected: usize,
  pub mean: f64,
  /// Bessel-corrected.
  pub std_dev: f64,
  /// `std_dev / mean`.
  pub cv: f64,
  pub min: f64,
  pub max: f64,
  pub q1: f64,
  pub median: f64,
  pub q3: f64,
}

impl SampleStats {
  #[inline]
  #[must_use]
  pub fn is_high_variance(&self, threshold: f64) -> bool {
    self.cv > threshold
  }

  #[must_use]
  pub fn variance_quality(&self, threshold: f64) -> VarianceQuality {
    if self.sample_count < MIN_SAMPLES {
      VarianceQuality::InsufficientSamples
    } else if self.cv <= threshold / 2.0 {
      VarianceQuality::Excellent
    } else if self.cv <= threshold {
      VarianceQuality::Good
    } else if self.cv <= threshold * 2.0 {
      VarianceQuality::Moderate
    } else {
      VarianceQuality::High
    }
  }
}

/// Qualitative grade of measurement noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceQuality {
  InsufficientSamples,
  /// CV ≤ threshold/2.
  Excellent,
  /// CV ≤ threshold.
  Good,
  /// CV ≤ 2×threshold.
  Moderate,
  /// CV > 2×threshold; repeat the measurement.
  High,
}

impl VarianceQuality {
  #[must_use]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::InsufficientSamples => "insufficient",
      Self::Excellent => "excellent",
      Self::Good => "good",
      Self::Moderate => "moderate",
      Self::High => "high",
    }
  }
}

impl core::fmt::Display for VarianceQuality {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Arithmetic mean; 0 for no samples.
#[inline]
#[must_use]
pub fn mean(samples: &[f64]) -> f64 {
  if samples.is_empty() {
    return 0.0;
  }
  samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation (divides by `n - 1`); 0 below two samples.
#[must_use]
pub fn std_dev(samples: &[f64], mean_value: f64) -> f64 {
  if samples.len() < 2 {
    return 0.0;
  }
  let sum_sq: f64 = samples.iter().map(|&x| (x - mean_value) * (x - mean_value)).sum();
  (sum_sq / (samples.len() - 1) as f64).sqrt()
}

/// `std_dev / mean`, or 0 when the mean is effectively zero.
#[inline]
#[must_use]
pub fn coefficient_of_variation(std_dev: f64, mean: f64) -> f64 {
  if mean.abs() < f64::EPSILON {
    return 0.0;
  }
  std_dev / mean
}

fn sorted(samples: &[f64]) -> Vec<f64> {
  let mut out = samples.to_vec();
  out.sort_by(f64::total_cmp);
  out
}

/// Linear-interpolated percentile of an already sorted slice.
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
  match sorted {
    [] => 0.0,
    [only] => *only,
    _ => {
      let idx = p * (sorted.len() - 1) as f64;
      let lower = idx.floor() as usize;
      let upper = idx.ceil() as usize;
      let frac = idx - lower as f64;
      sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
  }
}

/// `(Q1, median, Q3)`.
#[must_use]
pub fn quartiles(samples: &[f64]) -> (f64, f64, f64) {
  let sorted = sorted(samples);
  (
    percentile_sorted(&sorted, 0.25),
    percentile_sorted(&sorted, 0.50),
    percentile_sorted(&sorted, 0.75),
  )
}

/// Drop samples outside the Tukey fences. Fewer than 4 samples pass through.
#[must_use]
pub fn reject_outliers_iqr(samples: &[f64], iqr_multiplier: f64) -> Vec<f64> {
  if samples.len() < 4 {
    return samples.to_vec();
  }

  let (q1, _, q3) = quartiles(samples);
  let iqr = q3 - q1;
  let lower_fence = q1 - iqr_multiplier * iqr;
  let upper_fence = q3 + iqr_multiplier * iqr;

  samples
    .iter()
    .copied()
    .filter(|&x| (lower_fence..=upper_fence).contains(&x))
    .collect()
}

/// Statistics with the default Tukey fences.
#[must_use]
pub fn compute_stats(samples: &[f64]) -> SampleStats {
  compute_stats_with_iqr(samples, IQR_MULTIPLIER)
}

#[must_use]
pub fn compute_stats_with_iqr(samples: &[f64], iqr_multiplier: f64) -> SampleStats {
  let filtered = reject_outliers_iqr(samples, iqr_multiplier);
  if filtered.is_empty() {
    return summarize(samples, 0);
  }
  summarize(&filtered, samples.len() - filtered.len())
}

fn summarize(samples: &[f64], outliers_rejected: usize) -> SampleStats {
  let sorted = sorted(samples);
  let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
    return SampleStats::default();
  };

  let mean = mean(&sorted);
  let std_dev = std_dev(&sorted, mean);

  SampleStats {
    sample_count: sorted.len(),
    outliers_rejected,
    mean,
    std_dev,
    cv: coefficient_of_variation(std_dev, mean),
    min,
    max,
    q1: percentile_sorted(&sorted, 0.25),
    median: percentile_sorted(&sorted, 0.50),
    q3: percentile_sorted(&sorted, 0.75),
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  #[test]
  fn mean_and_std_dev() {
    assert!((mean(&[1.0, 2.0, 3.0, 4.0, 5.0]) - 3.0).abs() < 1e-12);
    assert_eq!(mean(&[]), 0.0);

    let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    let sd = std_dev(&samples, mean(&samples));
    // Bessel-corrected: sqrt(32 / 7)
    assert!((sd - (32.0f64 / 7.0).sqrt()).abs() < 1e-12, "std_dev = {sd}");
    assert_eq!(std_dev(&[3.0], 3.0), 0.0);
  }

  #[test]
  fn cv_guards_zero_mean() {
    assert!((coefficient_of_variation(2.0, 10.0) - 0.2).abs() < 1e-12);
    assert_eq!(coefficient_of_variation(1.0, 0.0), 0.0);
  }

  #[test]
  fn quartiles_interpolate() {
    let (q1, median, q3) = quartiles(&[4.0, 1.0, 3.0, 2.0]);
    assert!((q1 - 1.75).abs() < 1e-12);
    assert!((median - 2.5).abs() < 1e-12);
    assert!((q3 - 3.25).abs() < 1e-12);
    assert_eq!(quartiles(&[]), (0.0, 0.0, 0.0));
    assert_eq!(quartiles(&[7.0]), (7.0, 7.0, 7.0));
  }

  #[test]
  fn tukey_fences_drop_both_tails() {
    let samples = [10.0, 11.0, 12.0, 11.5, 10.5, 100.0, 0.1];
    let kept = reject_outliers_iqr(&samples, IQR_MULTIPLIER);
    assert_eq!(kept, [10.0, 11.0, 12.0, 11.5, 10.5]);
    assert_eq!(reject_outliers_iqr(&[1.0, 100.0, 1.0], IQR_MULTIPLIER).len(), 3);
  }

  #[test]
  fn empty_and_single_inputs() {
    assert_eq!(compute_stats(&[]), SampleStats::default());

    let one = compute_stats(&[0.25]);
    assert_eq!(one.sample_count, 1);
    assert_eq!(one.mean, 0.25);
    assert_eq!(one.std_dev, 0.0);
    assert_eq!(one.variance_quality(DEFAULT_CV_THRESHOLD), VarianceQuality::InsufficientSamples);
  }

  #[test]
  fn preempted_run_is_rejected() {
    let mut runs = vec![0.50, 0.51, 0.49, 0.50, 0.50, 0.51, 0.49, 0.50];
    runs.push(1.40);

    let stats = compute_stats(&runs);
    assert_eq!(stats.outliers_rejected, 1);
    assert!((stats.mean - 0.50).abs() < 0.01, "mean = {}", stats.mean);
    assert!(stats.max < 0.52);
    assert_eq!(stats.variance_quality(DEFAULT_CV_THRESHOLD), VarianceQuality::Excellent);
  }

  #[test]
  fn variance_grades() {
    let mut stats = SampleStats {
      sample_count: 10,
      ..SampleStats::default()
    };
    for (cv, grade) in [
      (0.02, VarianceQuality::Excellent),
      (0.04, VarianceQuality::Good),
      (0.08, VarianceQuality::Moderate),
      (0.15, VarianceQuality::High),
    ] {
      stats.cv = cv;
      assert_eq!(stats.variance_quality(0.05), grade, "cv = {cv}");
    }
    assert!(stats.is_high_variance(0.05));
  }

  proptest! {
    #[test]
    fn summary_is_ordered(samples in prop::collection::vec(0.001f64..10.0, 1..64)) {
      let stats = compute_stats(&samples);
      prop_assert!(stats.sample_count >= 1);
      prop_assert_eq!(stats.sample_count + stats.outliers_rejected, samples.len());
      prop_assert!(stats.min <= stats.q1 && stats.q1 <= stats.median);
      prop_assert!(stats.median <= stats.q3 && stats.q3 <= stats.max);
      prop_assert!(stats.min <= stats.mean + 1e-9 && stats.mean <= stats.max + 1e-9);
      prop_assert!(stats.std_dev >= 0.0);
    }
  }
}
