//! Output formatters for harness results.
//!
//! - [`OutputFormat::Summary`]: human-readable (default)
//! - [`OutputFormat::Json`]: `serde_json`, for scripts
//! - [`OutputFormat::Tsv`]: one row per kernel, for spreadsheets

use std::io::{self, Write};

use crate::{TuneError, TuneResults};

/// Output format for harness results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
  #[default]
  Summary,
  Json,
  Tsv,
}

impl OutputFormat {
  /// Parse a format name (case-insensitive).
  #[must_use]
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "summary" | "text" | "human" => Some(Self::Summary),
      "json" => Some(Self::Json),
      "tsv" | "tab" => Some(Self::Tsv),
      _ => None,
    }
  }
}

/// Writes [`TuneResults`] to any sink.
pub struct Report<W: Write> {
  writer: W,
  format: OutputFormat,
}

impl<W: Write> Report<W> {
  pub fn new(writer: W, format: OutputFormat) -> Self {
    Self { writer, format }
  }

  pub fn write(&mut self, results: &TuneResults) -> Result<(), TuneError> {
    match self.format {
      OutputFormat::Summary => self.write_summary(results)?,
      OutputFormat::Json => {
        serde_json::to_writer_pretty(&mut self.writer, results)?;
        writeln!(self.writer)?;
      }
      OutputFormat::Tsv => self.write_tsv(results)?,
    }
    self.writer.flush()?;
    Ok(())
  }

  /// Consume the report and return the sink.
  pub fn into_inner(self) -> W {
    self.writer
  }

  fn write_summary(&mut self, results: &TuneResults) -> io::Result<()> {
    let p = &results.platform;
    writeln!(self.writer, "heavyload kernel timings")?;
    writeln!(self.writer, "========================")?;
    writeln!(self.writer)?;
    writeln!(self.writer, "Platform: {}/{}", p.arch, p.os)?;
    writeln!(self.writer, "Features: {}", join_or_none(&p.features))?;
    writeln!(self.writer, "Available: {}", join_or_none(&p.available_kernels))?;
    writeln!(
      self.writer,
      "Selected: {} (force: {} -> {})",
      p.selected_kernel, p.requested_force, p.effective_force
    )?;
    writeln!(
      self.writer,
      "Sampling: {} warmup + {} timed runs x {} adds",
      results.config.warmup_runs, results.config.sample_runs, results.config.iterations
    )?;
    writeln!(self.writer)?;

    writeln!(
      self.writer,
      "{:<14} {:<9} {:>12} {:>10} {:>12} {:>8}  quality",
      "kernel", "tier", "mean ms", "ns/add", "Glane-op/s", "cv %"
    )?;
    for k in &results.kernels {
      let s = &k.sample;
      writeln!(
        self.writer,
        "{:<14} {:<9} {:>12.3} {:>10.4} {:>12.2} {:>8.2}  {}",
        s.kernel,
        k.tier,
        s.stats.mean * 1e3,
        s.ns_per_add,
        s.giga_lane_ops_per_sec,
        s.stats.cv * 100.0,
        k.quality
      )?;
    }

    if let Some(best) = results.fastest() {
      writeln!(self.writer)?;
      writeln!(self.writer, "Fastest: {}", best.sample.kernel)?;
    }

    if let Some(full) = &results.full_run {
      writeln!(self.writer)?;
      writeln!(
        self.writer,
        "Full load: {} adds on {} in {:.3} s ({:.4} ns/add)",
        full.adds, full.kernel, full.elapsed_secs, full.ns_per_add
      )?;
    }

    Ok(())
  }

  fn write_tsv(&mut self, results: &TuneResults) -> io::Result<()> {
    writeln!(
      self.writer,
      "kernel\ttier\titerations\tsamples\toutliers\tmean_s\tstd_dev_s\tcv\tns_per_add\tglane_ops_per_s\tquality"
    )?;
    for k in &results.kernels {
      let s = &k.sample;
      writeln!(
        self.writer,
        "{}\t{}\t{}\t{}\t{}\t{:.9}\t{:.9}\t{:.6}\t{:.6}\t{:.6}\t{}",
        s.kernel,
        k.tier,
        s.iterations,
        s.stats.sample_count,
        s.stats.outliers_rejected,
        s.stats.mean,
        s.stats.std_dev,
        s.stats.cv,
        s.ns_per_add,
        s.giga_lane_ops_per_sec,
        k.quality
      )?;
    }
    Ok(())
  }
}

fn join_or_none(items: &[&str]) -> String {
  if items.is_empty() { "none".to_string() } else { items.join(", ") }
}
