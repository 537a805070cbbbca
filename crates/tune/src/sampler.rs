//! Stopwatch sampling of one kernel.
//!
//! The sampler:
//! 1. Runs `warmup_runs` untimed runs to settle clocks and caches
//! 2. Times `sample_runs` runs of `iterations` logical adds each
//! 3. Rejects outliers and grades the remaining spread
//!
//! Each sample is the wall-clock time of one complete kernel call, so the
//! recorded unit is seconds per run.

use std::time::Instant;

use load::{INCREMENT, INITIAL, KernelId, LANES, Lanes, Workload};
use serde::Serialize;

use crate::{
  TuneError,
  stats::{self, DEFAULT_CV_THRESHOLD, SampleStats},
};

/// Iterations per sample in the default configuration.
pub const DEFAULT_ITERATIONS: u64 = 100_000_000;

/// Sampler configuration.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SamplerConfig {
  /// Untimed runs before measuring.
  pub warmup_runs: u32,
  /// Timed runs.
  pub sample_runs: u32,
  /// Logical adds per run.
  pub iterations: u64,
  /// Coefficient of variation above which a measurement is flagged.
  pub cv_threshold: f64,
}

impl Default for SamplerConfig {
  fn default() -> Self {
    Self {
      warmup_runs: 2,
      sample_runs: 10,
      iterations: DEFAULT_ITERATIONS,
      cv_threshold: DEFAULT_CV_THRESHOLD,
    }
  }
}

impl SamplerConfig {
  /// Faster, noisier.
  #[must_use]
  pub fn quick() -> Self {
    Self {
      warmup_runs: 1,
      sample_runs: 5,
      iterations: 10_000_000,
      ..Default::default()
    }
  }

  /// Slower, steadier.
  #[must_use]
  pub fn thorough() -> Self {
    Self {
      warmup_runs: 3,
      sample_runs: 25,
      iterations: 250_000_000,
      ..Default::default()
    }
  }

  /// Reject configurations that cannot produce a measurement.
  pub fn validate(&self) -> Result<(), TuneError> {
    if self.sample_runs == 0 {
      return Err(TuneError::Args("sample runs must be at least 1".into()));
    }
    if self.iterations == 0 {
      return Err(TuneError::Args("iterations must be at least 1".into()));
    }
    if !self.cv_threshold.is_finite() || self.cv_threshold <= 0.0 {
      return Err(TuneError::Args(format!("invalid CV threshold: {}", self.cv_threshold)));
    }
    Ok(())
  }
}

/// Timings for one kernel.
#[derive(Clone, Debug, Serialize)]
pub struct SampledResult {
  pub kernel: &'static str,
  /// Logical adds per run.
  pub iterations: u64,
  /// Raw seconds per run, in run order.
  pub samples_secs: Vec<f64>,
  /// Statistics over `samples_secs` (seconds).
  pub stats: SampleStats,
  /// Mean nanoseconds per logical 8-lane add.
  pub ns_per_add: f64,
  /// Billions of 32-bit lane additions per second.
  pub giga_lane_ops_per_sec: f64,
  /// Accumulator left by the last timed run.
  #[serde(serialize_with = "serialize_lanes")]
  pub final_lanes: Lanes,
  /// Adds the kernel reported for the last timed run.
  pub final_adds: u64,
}

impl SampledResult {
  #[inline]
  #[must_use]
  pub fn is_high_variance(&self, threshold: f64) -> bool {
    self.stats.is_high_variance(threshold)
  }

  /// Accumulator every kernel must leave after `iterations` adds.
  #[inline]
  #[must_use]
  pub const fn expected_lanes(&self) -> Lanes {
    INITIAL.wrapping_add_splat(INCREMENT, self.iterations)
  }
}

fn serialize_lanes<S: serde::Serializer>(lanes: &Lanes, serializer: S) -> Result<S::Ok, S::Error> {
  lanes.as_array().serialize(serializer)
}

/// Times repeated runs of a pinned kernel.
pub struct Sampler<'a> {
  config: &'a SamplerConfig,
}

impl<'a> Sampler<'a> {
  #[inline]
  #[must_use]
  pub const fn new(config: &'a SamplerConfig) -> Self {
    Self { config }
  }

  /// Sample `kernel` at `iterations` adds per run.
  ///
  /// # Errors
  ///
  /// [`TuneError::Load`] if the kernel cannot run on this CPU.
  pub fn run(&self, kernel: KernelId, iterations: u64) -> Result<SampledResult, TuneError> {
    let workload = Workload::new(iterations).with_kernel(kernel);

    for _ in 0..self.config.warmup_runs {
      core::hint::black_box(workload.run()?);
    }

    let runs = self.config.sample_runs as usize;
    let mut samples_secs = Vec::with_capacity(runs);
    let mut last = None;
    for _ in 0..runs {
      let start = Instant::now();
      let outcome = workload.run()?;
      samples_secs.push(start.elapsed().as_secs_f64());
      last = Some(outcome);
    }
    let last = last.ok_or_else(|| TuneError::Args("sample runs must be at least 1".into()))?;

    let stats = stats::compute_stats(&samples_secs);
    Ok(SampledResult {
      kernel: kernel.name(),
      iterations,
      ns_per_add: ns_per_add(stats.mean, iterations),
      giga_lane_ops_per_sec: giga_lane_ops_per_sec(stats.mean, iterations),
      samples_secs,
      stats,
      final_lanes: last.lanes,
      final_adds: last.adds,
    })
  }
}

/// Nanoseconds per logical add; 0 when nothing ran.
#[inline]
#[must_use]
pub fn ns_per_add(secs_per_run: f64, iterations: u64) -> f64 {
  if iterations == 0 {
    return 0.0;
  }
  secs_per_run * 1e9 / iterations as f64
}

/// Lane additions per second, in billions; 0 when the timer saw nothing.
#[inline]
#[must_use]
pub fn giga_lane_ops_per_sec(secs_per_run: f64, iterations: u64) -> f64 {
  if secs_per_run <= 0.0 {
    return 0.0;
  }
  (iterations as f64 * LANES as f64) / secs_per_run / 1e9
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn presets_are_valid() {
    for config in [SamplerConfig::default(), SamplerConfig::quick(), SamplerConfig::thorough()] {
      config.validate().unwrap();
    }
    assert!(SamplerConfig::quick().iterations < SamplerConfig::default().iterations);
    assert!(SamplerConfig::thorough().sample_runs > SamplerConfig::default().sample_runs);
  }

  #[test]
  fn validate_rejects_degenerate_configs() {
    let zero_runs = SamplerConfig {
      sample_runs: 0,
      ..SamplerConfig::quick()
    };
    assert!(matches!(zero_runs.validate(), Err(TuneError::Args(_))));

    let zero_iters = SamplerConfig {
      iterations: 0,
      ..SamplerConfig::quick()
    };
    assert!(matches!(zero_iters.validate(), Err(TuneError::Args(_))));

    let bad_cv = SamplerConfig {
      cv_threshold: f64::NAN,
      ..SamplerConfig::quick()
    };
    assert!(matches!(bad_cv.validate(), Err(TuneError::Args(_))));
  }

  #[test]
  fn rates() {
    assert!((ns_per_add(1.0, 1_000_000_000) - 1.0).abs() < 1e-12);
    assert!((giga_lane_ops_per_sec(1.0, 1_000_000_000) - 8.0).abs() < 1e-12);
    assert_eq!(ns_per_add(1.0, 0), 0.0);
    assert_eq!(giga_lane_ops_per_sec(0.0, 10), 0.0);
  }

  #[test]
  fn samples_portable_kernel() {
    let config = SamplerConfig {
      warmup_runs: 1,
      sample_runs: 6,
      iterations: 10_000,
      ..Default::default()
    };
    let result = Sampler::new(&config).run(KernelId::Portable, 10_000).unwrap();

    assert_eq!(result.kernel, "portable");
    assert_eq!(result.samples_secs.len(), 6);
    assert_eq!(result.stats.sample_count + result.stats.outliers_rejected, 6);
    assert_eq!(result.final_adds, 10_000);
    assert_eq!(result.final_lanes, result.expected_lanes());
    assert_eq!(result.final_lanes, Lanes::splat(10_001));
  }

  #[test]
  fn unavailable_kernel_is_an_error() {
    let foreign = if cfg!(target_arch = "aarch64") { KernelId::X86Avx2 } else { KernelId::ArmNeon };
    let config = SamplerConfig::quick();
    let err = Sampler::new(&config).run(foreign, 10).unwrap_err();
    assert!(matches!(err, TuneError::Load(_)));
  }
}
