//! The ldcheck command-line interface.
//!
//! Parses arguments, resolves the manifests to run, picks the processor and hands
//! everything to the [`SuiteRunner`].

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use crate::config::{detect_color, RunConfig, DEFAULT_MANIFEST_SUFFIX};
use crate::discovery::{TestDiscoverer, TestSource};
use crate::errors::HarnessError;
use crate::processor::{CommandProcessor, Processor, UnconfiguredProcessor};
use crate::runner::{SuiteRunner, Tally};

// ============================================================================
// CLI ARGUMENTS
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "ldcheck",
    version,
    about = "Runs JSON-LD conformance manifests against a processor."
)]
pub struct LdcheckArgs {
    /// The single test file to run.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// The directory full of test files.
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Prints verbose test data.
    #[arg(short, long)]
    pub verbose: bool,

    /// Processor executable; receives one JSON request per operation on stdin.
    #[arg(long, value_name = "PROGRAM")]
    pub processor: Option<PathBuf>,

    /// Extra argument passed to the processor executable (repeatable).
    #[arg(long = "processor-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub processor_args: Vec<String>,

    /// Extension of manifest files found under --directory.
    #[arg(long, value_name = "EXT", default_value = DEFAULT_MANIFEST_SUFFIX)]
    pub suffix: String,

    /// Only run tests whose name contains this text (case-insensitive).
    #[arg(long, value_name = "TEXT")]
    pub filter: Option<String>,

    /// When to color the report.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto => detect_color(),
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

impl LdcheckArgs {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            verbose: self.verbose,
            color: self.color.choice(),
            manifest_suffix: self.suffix.trim_start_matches('.').to_string(),
            filter: self.filter.clone(),
        }
    }

    pub fn test_source(&self) -> TestSource {
        TestSource {
            file: self.file.clone(),
            directory: self.directory.clone(),
        }
    }

    fn command_processor(&self) -> Option<CommandProcessor> {
        self.processor
            .as_ref()
            .map(|program| CommandProcessor::new(program).with_args(self.processor_args.iter().cloned()))
    }
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// Exit status: 0 all passed, 1 some case failed, 2 the run could not start.
pub fn run() -> ExitCode {
    init_logging();
    let args = LdcheckArgs::parse();

    match execute(&args) {
        Ok(tally) if tally.has_failures() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let code = if e.is_configuration() { 2 } else { 1 };
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::from(code)
        }
    }
}

/// Runs the suite described by `args`, printing the report to stdout.
pub fn execute(args: &LdcheckArgs) -> Result<Tally, HarnessError> {
    let config = args.run_config();
    let stdout = StandardStream::stdout(config.color);

    match args.command_processor() {
        Some(processor) => run_suite(&processor, args, config, stdout),
        None => run_suite(&UnconfiguredProcessor, args, config, stdout),
    }
}

fn run_suite<P: Processor>(
    processor: &P,
    args: &LdcheckArgs,
    config: RunConfig,
    stdout: StandardStream,
) -> Result<Tally, HarnessError> {
    let suffix = config.manifest_suffix.clone();
    let mut runner = SuiteRunner::new(processor, stdout, config);
    runner.reporter_mut().banner()?;

    let manifests = TestDiscoverer::resolve(&args.test_source(), &suffix)?;
    runner.run(&manifests)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ldcheck=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
