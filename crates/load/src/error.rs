//! Error types for the instrumented load API.
//!
//! The exported load function never fails; these only surface when a caller
//! pins a kernel by id or by name.

/// Failure to run a requested kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
  /// The kernel is not compiled for this architecture or the CPU lacks the
  /// features it needs.
  #[error("kernel `{kernel}` is not available on this CPU")]
  KernelUnavailable {
    /// Name of the requested kernel.
    kernel: &'static str,
  },
  /// The name does not match any kernel.
  #[error("unknown kernel name")]
  UnknownKernel,
}
