//! Instrumented runs with a configurable iteration count.

use crate::{HEAVY_LOAD_ITERATIONS, INCREMENT, INITIAL, Lanes, error::LoadError, kernels, kernels::KernelId};

/// Result of an instrumented run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOutcome {
  /// Accumulator after the last add.
  pub lanes: Lanes,
  /// Logical 8-lane adds the kernel performed.
  pub adds: u64,
  /// Name of the kernel that ran.
  pub kernel: &'static str,
}

/// A configurable load run.
///
/// ```
/// use load::Workload;
///
/// let outcome = Workload::new(1_000).run()?;
/// assert_eq!(outcome.adds, 1_000);
/// assert_eq!(outcome.lanes, load::Lanes::splat(1_001));
/// # Ok::<(), load::LoadError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Workload {
  iterations: u64,
  initial: Lanes,
  kernel: Option<KernelId>,
}

impl Workload {
  /// `iterations` adds on the standard all-ones accumulator, auto-selected kernel.
  #[inline]
  #[must_use]
  pub const fn new(iterations: u64) -> Self {
    Self {
      iterations,
      initial: INITIAL,
      kernel: None,
    }
  }

  /// The exported function's workload: one billion adds.
  #[inline]
  #[must_use]
  pub const fn heavy() -> Self {
    Self::new(HEAVY_LOAD_ITERATIONS)
  }

  #[inline]
  #[must_use]
  pub const fn with_initial(mut self, initial: Lanes) -> Self {
    self.initial = initial;
    self
  }

  /// Pin a kernel instead of using the process-wide selection.
  #[inline]
  #[must_use]
  pub const fn with_kernel(mut self, kernel: KernelId) -> Self {
    self.kernel = Some(kernel);
    self
  }

  #[inline]
  #[must_use]
  pub const fn iterations(&self) -> u64 {
    self.iterations
  }

  #[inline]
  #[must_use]
  pub const fn initial(&self) -> Lanes {
    self.initial
  }

  #[inline]
  #[must_use]
  pub const fn kernel(&self) -> Option<KernelId> {
    self.kernel
  }

  /// Lanes every kernel must produce for this workload.
  #[inline]
  #[must_use]
  pub const fn expected(&self) -> Lanes {
    self.initial.wrapping_add_splat(INCREMENT, self.iterations)
  }

  /// Run the workload on the calling thread.
  ///
  /// # Errors
  ///
  /// [`LoadError::KernelUnavailable`] if a pinned kernel cannot run here.
  pub fn run(&self) -> Result<LoadOutcome, LoadError> {
    let (name, func) = match self.kernel {
      Some(id) => (id.name(), id.resolve(platform::caps())?),
      None => {
        let selected = kernels::selected();
        (selected.name, selected.func)
      }
    };
    let (lanes, adds) = func(self.initial, self.iterations);
    Ok(LoadOutcome {
      lanes,
      adds,
      kernel: name,
    })
  }
}

impl Default for Workload {
  #[inline]
  fn default() -> Self {
    Self::heavy()
  }
}
