//! Stopwatch harness for the heavyload kernels.
//!
//! Times every kernel runnable on this machine (or one pinned kernel),
//! verifies each run against the closed-form result, and reports the spread.
//!
//! # Quick Start
//!
//! ```no_run
//! use tune::{BenchRunner, PlatformInfo, SamplerConfig};
//!
//! let runner = BenchRunner::new(SamplerConfig::quick());
//! let kernels = runner.run_all(platform::caps())?;
//! for k in &kernels {
//!   println!("{}: {:.3} ns/add", k.sample.kernel, k.sample.ns_per_add);
//! }
//! println!("{:?}", PlatformInfo::collect());
//! # Ok::<(), tune::TuneError>(())
//! ```
//!
//! Run the `heavyload-tune` binary for formatted output.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod report;
mod runner;
pub mod sampler;
pub mod stats;

use load::{KernelId, LoadError, config};
use serde::Serialize;

pub use report::{OutputFormat, Report};
pub use runner::{BenchRunner, FullRun, KernelResult};
pub use sampler::{SampledResult, Sampler, SamplerConfig};
pub use stats::{DEFAULT_CV_THRESHOLD, SampleStats, VarianceQuality};

/// Error type for harness operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TuneError {
  /// A kernel could not run.
  #[error(transparent)]
  Load(#[from] LoadError),

  /// Nothing to measure.
  #[error("no kernels available to benchmark")]
  NoKernels,

  /// A kernel produced the wrong accumulator or add count.
  #[error("kernel `{kernel}` failed verification: {detail}")]
  Verification { kernel: &'static str, detail: String },

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  /// Invalid command-line or configuration value.
  #[error("{0}")]
  Args(String),
}

/// Machine and dispatch state at measurement time.
#[derive(Clone, Debug, Serialize)]
pub struct PlatformInfo {
  /// CPU architecture (e.g., "x86_64").
  pub arch: &'static str,
  pub os: &'static str,
  /// Features reported by the hardware.
  pub features: Vec<&'static str>,
  /// Kernels runnable here, best first.
  pub available_kernels: Vec<&'static str>,
  /// Kernel the exported load uses in this process.
  pub selected_kernel: &'static str,
  /// `HEAVYLOAD_FORCE` as requested.
  pub requested_force: &'static str,
  /// `HEAVYLOAD_FORCE` after clamping to the CPU.
  pub effective_force: &'static str,
}

impl PlatformInfo {
  #[must_use]
  pub fn collect() -> Self {
    let caps = platform::caps();
    let cfg = config::get();
    Self {
      arch: platform::arch().name(),
      os: std::env::consts::OS,
      features: platform::detected_caps().names().collect(),
      available_kernels: load::kernels::available(caps).map(KernelId::name).collect(),
      selected_kernel: load::selected_kernel(),
      requested_force: cfg.requested_force.as_str(),
      effective_force: cfg.effective_force.as_str(),
    }
  }
}

/// Everything one harness invocation measured.
#[derive(Clone, Debug, Serialize)]
pub struct TuneResults {
  pub platform: PlatformInfo,
  pub config: SamplerConfig,
  pub kernels: Vec<KernelResult>,
  /// One timed run of the full one-billion-add load, if requested.
  pub full_run: Option<FullRun>,
  /// Seconds since the Unix epoch.
  pub timestamp: u64,
}

impl TuneResults {
  #[must_use]
  pub fn new(platform: PlatformInfo, config: SamplerConfig, kernels: Vec<KernelResult>) -> Self {
    let timestamp = std::time::SystemTime::now()
      .duration_since(std::time::UNIX_EPOCH)
      .map(|d| d.as_secs())
      .unwrap_or(0);
    Self {
      platform,
      config,
      kernels,
      full_run: None,
      timestamp,
    }
  }

  #[must_use]
  pub fn with_full_run(mut self, full_run: FullRun) -> Self {
    self.full_run = Some(full_run);
    self
  }

  /// Kernel with the highest lane-op rate.
  #[must_use]
  pub fn fastest(&self) -> Option<&KernelResult> {
    self
      .kernels
      .iter()
      .max_by(|a, b| a.sample.giga_lane_ops_per_sec.total_cmp(&b.sample.giga_lane_ops_per_sec))
  }
}
