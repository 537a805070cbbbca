//! Benchmark runner: sampling, verification and variance warnings.

use std::time::Instant;

use load::{HEAVY_LOAD_ITERATIONS, KernelId, Workload};
use platform::Caps;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  TuneError,
  sampler::{SampledResult, Sampler, SamplerConfig, ns_per_add},
  stats::VarianceQuality,
};

/// Measurement of one kernel.
#[derive(Clone, Debug, Serialize)]
pub struct KernelResult {
  pub tier: &'static str,
  pub quality: VarianceQuality,
  pub sample: SampledResult,
}

/// One timed run of the full exported workload.
#[derive(Clone, Debug, Serialize)]
pub struct FullRun {
  pub kernel: &'static str,
  pub adds: u64,
  pub elapsed_secs: f64,
  pub ns_per_add: f64,
}

/// Runs the sampler over kernels and checks what they computed.
#[derive(Clone, Debug)]
pub struct BenchRunner {
  config: SamplerConfig,
  warn_high_variance: bool,
}

impl Default for BenchRunner {
  fn default() -> Self {
    Self::new(SamplerConfig::default())
  }
}

impl BenchRunner {
  #[must_use]
  pub fn new(config: SamplerConfig) -> Self {
    Self {
      config,
      warn_high_variance: true,
    }
  }

  #[must_use]
  pub fn quick() -> Self {
    Self::new(SamplerConfig::quick())
  }

  #[must_use]
  pub fn thorough() -> Self {
    Self::new(SamplerConfig::thorough())
  }

  #[must_use]
  pub fn with_iterations(mut self, iterations: u64) -> Self {
    self.config.iterations = iterations;
    self
  }

  #[must_use]
  pub fn with_sample_runs(mut self, runs: u32) -> Self {
    self.config.sample_runs = runs;
    self
  }

  #[must_use]
  pub fn with_warmup_runs(mut self, runs: u32) -> Self {
    self.config.warmup_runs = runs;
    self
  }

  #[must_use]
  pub fn with_cv_threshold(mut self, threshold: f64) -> Self {
    self.config.cv_threshold = threshold;
    self
  }

  #[must_use]
  pub fn without_variance_warnings(mut self) -> Self {
    self.warn_high_variance = false;
    self
  }

  #[inline]
  #[must_use]
  pub fn config(&self) -> &SamplerConfig {
    &self.config
  }

  /// `Some(cv)` when warnings are on and the result exceeds the threshold.
  #[must_use]
  pub fn check_variance(&self, result: &SampledResult) -> Option<f64> {
    if self.warn_high_variance && result.is_high_variance(self.config.cv_threshold) {
      Some(result.stats.cv)
    } else {
      None
    }
  }

  /// Log a warning for a noisy result. Returns `true` if one was logged.
  pub fn warn_if_high_variance(&self, result: &SampledResult) -> bool {
    let Some(cv) = self.check_variance(result) else {
      return false;
    };
    warn!(
      kernel = result.kernel,
      cv_percent = cv * 100.0,
      threshold_percent = self.config.cv_threshold * 100.0,
      "high variance in measurement"
    );
    true
  }

  /// Sample and verify one kernel.
  ///
  /// # Errors
  ///
  /// - [`TuneError::Args`] for an unusable sampler configuration
  /// - [`TuneError::Load`] if the kernel cannot run here
  /// - [`TuneError::Verification`] if the kernel computed the wrong result
  pub fn measure(&self, kernel: KernelId) -> Result<KernelResult, TuneError> {
    self.config.validate()?;
    debug!(kernel = kernel.name(), iterations = self.config.iterations, "sampling");

    let sample = Sampler::new(&self.config).run(kernel, self.config.iterations)?;
    verify(&sample)?;
    self.warn_if_high_variance(&sample);

    let quality = sample.stats.variance_quality(self.config.cv_threshold);
    info!(
      kernel = sample.kernel,
      ops_per_add = kernel.tier().ops_per_logical_add(),
      ns_per_add = sample.ns_per_add,
      glane_ops = sample.giga_lane_ops_per_sec,
      quality = quality.as_str(),
      "measured"
    );

    Ok(KernelResult {
      tier: kernel.tier().name(),
      quality,
      sample,
    })
  }

  /// Measure each kernel in order.
  ///
  /// # Errors
  ///
  /// [`TuneError::NoKernels`] for an empty list, otherwise the first
  /// [`measure`](Self::measure) failure.
  pub fn run_kernels(&self, kernels: &[KernelId]) -> Result<Vec<KernelResult>, TuneError> {
    if kernels.is_empty() {
      return Err(TuneError::NoKernels);
    }
    kernels.iter().map(|&kernel| self.measure(kernel)).collect()
  }

  /// Measure every kernel `caps` can run, best first.
  pub fn run_all(&self, caps: Caps) -> Result<Vec<KernelResult>, TuneError> {
    let kernels: Vec<KernelId> = load::kernels::available(caps).collect();
    self.run_kernels(&kernels)
  }

  /// Time one full one-billion-add run on the process-selected kernel.
  pub fn run_full(&self) -> Result<FullRun, TuneError> {
    let workload = Workload::heavy();
    info!(kernel = load::selected_kernel(), "timing full load");

    let start = Instant::now();
    let outcome = workload.run()?;
    let elapsed_secs = start.elapsed().as_secs_f64();

    if outcome.adds != HEAVY_LOAD_ITERATIONS || outcome.lanes != workload.expected() {
      return Err(TuneError::Verification {
        kernel: outcome.kernel,
        detail: format!(
          "full run left {:?} after {} adds, expected {:?} after {HEAVY_LOAD_ITERATIONS}",
          outcome.lanes,
          outcome.adds,
          workload.expected()
        ),
      });
    }

    Ok(FullRun {
      kernel: outcome.kernel,
      adds: outcome.adds,
      elapsed_secs,
      ns_per_add: ns_per_add(elapsed_secs, outcome.adds),
    })
  }
}

fn verify(sample: &SampledResult) -> Result<(), TuneError> {
  if sample.final_adds != sample.iterations {
    return Err(TuneError::Verification {
      kernel: sample.kernel,
      detail: format!("adds {} != iterations {}", sample.final_adds, sample.iterations),
    });
  }
  let expected = sample.expected_lanes();
  if sample.final_lanes != expected {
    return Err(TuneError::Verification {
      kernel: sample.kernel,
      detail: format!("lanes {:?} != expected {expected:?}", sample.final_lanes),
    });
  }
  Ok(())
}
