//! Stopwatch harness for the heavyload kernels.
//!
//! Usage:
//!   cargo run --release -p tune --bin heavyload-tune
//!   cargo run --release -p tune --bin heavyload-tune -- --quick --format json
//!   cargo run --release -p tune --bin heavyload-tune -- --kernel sse2 --full

use std::{env, io, process::ExitCode};

use load::KernelId;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tune::{BenchRunner, OutputFormat, PlatformInfo, Report, SamplerConfig, TuneError, TuneResults};

/// CLI arguments.
#[derive(Debug, Default, PartialEq)]
struct Args {
  quick: bool,
  iterations: Option<u64>,
  samples: Option<u32>,
  warmup: Option<u32>,
  /// Measure only this kernel.
  kernel: Option<KernelId>,
  format: OutputFormat,
  /// Also time one full one-billion-add run.
  full: bool,
  verbose: bool,
  help: bool,
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Args, TuneError> {
  fn value<T: std::str::FromStr>(flag: &str, raw: Option<String>) -> Result<T, TuneError> {
    let raw = raw.ok_or_else(|| TuneError::Args(format!("{flag} requires a value")))?;
    raw
      .trim()
      .parse()
      .map_err(|_| TuneError::Args(format!("invalid value for {flag}: {raw}")))
  }

  let mut args = Args::default();
  let mut iter = argv.into_iter();

  while let Some(arg) = iter.next() {
    match arg.as_str() {
      "--" => continue,
      "--quick" | "-q" => args.quick = true,
      "--full" => args.full = true,
      "--verbose" | "-v" => args.verbose = true,
      "--help" | "-h" => args.help = true,
      "--iterations" | "-n" => args.iterations = Some(value(&arg, iter.next())?),
      "--samples" | "-s" => args.samples = Some(value(&arg, iter.next())?),
      "--warmup" | "-w" => args.warmup = Some(value(&arg, iter.next())?),
      "--kernel" | "-k" => {
        let name: String = value(&arg, iter.next())?;
        let id = KernelId::from_name(&name).ok_or_else(|| TuneError::Args(format!("unknown kernel: {name}")))?;
        args.kernel = Some(id);
      }
      "--format" | "-f" => {
        let name: String = value(&arg, iter.next())?;
        args.format = OutputFormat::parse(&name).ok_or_else(|| TuneError::Args(format!("unknown format: {name}")))?;
      }
      other => return Err(TuneError::Args(format!("unknown argument: {other}"))),
    }
  }

  Ok(args)
}

fn print_help() {
  eprintln!(
    "\
heavyload-tune: time the heavyload kernels on this machine

USAGE:
    cargo run --release -p tune --bin heavyload-tune -- [OPTIONS]

    For representative numbers, build with native CPU flags:
    RUSTFLAGS='-C target-cpu=native' cargo run --release -p tune --bin heavyload-tune

OPTIONS:
    -q, --quick            Fewer, shorter runs (noisier)
    -n, --iterations N     Logical adds per timed run
    -s, --samples N        Timed runs per kernel
    -w, --warmup N         Untimed runs before measuring
    -k, --kernel NAME      Only this kernel (portable, sse2, avx2, neon)
    -f, --format FORMAT    summary (default), json, tsv
        --full             Also time one full one-billion-add run
    -v, --verbose          Debug logging (RUST_LOG overrides)
    -h, --help             Show this help message

ENVIRONMENT:
    HEAVYLOAD_FORCE        Pin the kernel used by the exported load
    RUST_LOG               Log filter (default: info)
"
  );
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "info" };
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
    .init();
}

fn sampler_config(args: &Args) -> SamplerConfig {
  let mut config = if args.quick {
    SamplerConfig::quick()
  } else {
    SamplerConfig::default()
  };
  if let Some(n) = args.iterations {
    config.iterations = n;
  }
  if let Some(n) = args.samples {
    config.sample_runs = n;
  }
  if let Some(n) = args.warmup {
    config.warmup_runs = n;
  }
  config
}

fn run(args: &Args) -> Result<(), TuneError> {
  let config = sampler_config(args);
  config.validate()?;

  let platform = PlatformInfo::collect();
  info!(
    arch = platform.arch,
    selected = platform.selected_kernel,
    force = platform.effective_force,
    "platform"
  );

  let runner = BenchRunner::new(config.clone());
  let kernels = match args.kernel {
    Some(id) => runner.run_kernels(&[id])?,
    None => runner.run_all(platform::caps())?,
  };

  let mut results = TuneResults::new(platform, config, kernels);
  if args.full {
    results = results.with_full_run(runner.run_full()?);
  }

  Report::new(io::stdout().lock(), args.format).write(&results)
}

fn main() -> ExitCode {
  let args = match parse_args(env::args().skip(1)) {
    Ok(args) => args,
    Err(err) => {
      eprintln!("Error: {err}");
      eprintln!("Run with --help for usage information.");
      return ExitCode::FAILURE;
    }
  };

  if args.help {
    print_help();
    return ExitCode::SUCCESS;
  }

  init_tracing(args.verbose);

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("{err}");
      ExitCode::FAILURE
    }
  }
}
