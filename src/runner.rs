//! Drives manifests through load → dispatch → check → report.
//!
//! Cases run strictly one after another. A failing case (missing fixture, processor
//! error, mismatch) never stops the ones after it, and a manifest that cannot be
//! loaded never stops the manifests after it.

use std::path::{Path, PathBuf};

use termcolor::WriteColor;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::dispatch::{dispatch, DispatchError, Dispatched};
use crate::equivalence::{equivalent, Actual};
use crate::errors::{FixtureError, HarnessError, ProcessorError};
use crate::fixture::{Expected, LoadedCase};
use crate::manifest::{TestCase, TestManifest};
use crate::processor::Processor;
use crate::report::{CaseLabel, Reporter};

/// Counters accumulated over one invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    /// Cases that were executed: `passed + failed`.
    pub run: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub broken_manifests: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &CaseOutcome) {
        match outcome {
            CaseOutcome::Passed { .. } => {
                self.run += 1;
                self.passed += 1;
            }
            CaseOutcome::Failed(_) => {
                self.run += 1;
                self.failed += 1;
            }
            CaseOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.broken_manifests > 0
    }
}

/// The result of one case.
#[derive(Debug)]
pub enum CaseOutcome {
    Passed { expected: Expected, actual: Actual },
    Failed(Failure),
    Skipped(SkipReason),
}

impl CaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Passed { .. })
    }
}

/// Why a case failed.
#[derive(Debug)]
pub enum Failure {
    /// The processor's output is not equivalent to the expected fixture.
    Mismatch { expected: Expected, actual: Actual },
    /// The processor reported an error instead of an output.
    Processor { expected: Expected, error: ProcessorError },
    /// A fixture could not be loaded.
    Fixture(FixtureError),
}

/// Why a case was not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownOperation(String),
    Filtered(String),
}

/// Runs suites of manifests against one processor.
pub struct SuiteRunner<'p, P: ?Sized, W> {
    processor: &'p P,
    reporter: Reporter<W>,
    config: RunConfig,
}

impl<'p, P, W> SuiteRunner<'p, P, W>
where
    P: Processor + ?Sized,
    W: WriteColor,
{
    pub fn new(processor: &'p P, out: W, config: RunConfig) -> Self {
        let reporter = Reporter::new(out, config.verbose);
        Self {
            processor,
            reporter,
            config,
        }
    }

    pub fn reporter_mut(&mut self) -> &mut Reporter<W> {
        &mut self.reporter
    }

    pub fn into_output(self) -> W {
        self.reporter.into_inner()
    }

    /// Runs every manifest in order and prints the summary.
    pub fn run<I>(&mut self, manifests: I) -> Result<Tally, HarnessError>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let mut tally = Tally::default();
        for manifest in manifests {
            tally = self.run_manifest(manifest.as_ref(), tally)?;
        }
        self.reporter.summary(&tally)?;
        Ok(tally)
    }

    /// Runs one manifest's cases, folding their outcomes into `tally`.
    ///
    /// Fixture paths resolve against the manifest's own directory.
    pub fn run_manifest(&mut self, path: &Path, mut tally: Tally) -> Result<Tally, HarnessError> {
        let manifest = match TestManifest::load(path) {
            Ok(manifest) => manifest,
            Err(err) => {
                warn!(manifest = %path.display(), error = %err, "skipping broken manifest");
                tally.broken_manifests += 1;
                self.reporter.broken_manifest(path, &err)?;
                return Ok(tally);
            }
        };
        let base_dir = base_dir(path);
        info!(
            manifest = %path.display(),
            group = %manifest.group,
            cases = manifest.tests.len(),
            "running manifest"
        );

        let total = manifest.tests.len();
        for (i, case) in manifest.tests.iter().enumerate() {
            let outcome = self.run_case(case, &base_dir);
            debug!(group = %manifest.group, case = %case.name, pass = outcome.is_pass(), "case finished");
            tally.record(&outcome);
            let label = CaseLabel {
                group: &manifest.group,
                index: i + 1,
                total,
                name: &case.name,
            };
            self.reporter.case(label, &outcome)?;
        }
        Ok(tally)
    }

    /// Runs a single case: load, dispatch, check.
    pub fn run_case(&self, case: &TestCase, base_dir: &Path) -> CaseOutcome {
        if let Some(reason) = self.config.filter_reason(&case.name) {
            return CaseOutcome::Skipped(SkipReason::Filtered(reason));
        }

        let loaded = match LoadedCase::load(case, base_dir) {
            Ok(loaded) => loaded,
            Err(err) => return CaseOutcome::Failed(Failure::Fixture(err)),
        };

        let actual = match dispatch(self.processor, case, &loaded) {
            Ok(Dispatched::Output(actual)) => actual,
            Ok(Dispatched::Unrecognized(name)) => {
                return CaseOutcome::Skipped(SkipReason::UnknownOperation(name))
            }
            Err(DispatchError::Fixture(err)) => return CaseOutcome::Failed(Failure::Fixture(err)),
            Err(DispatchError::Processor(error)) => {
                return CaseOutcome::Failed(Failure::Processor {
                    expected: loaded.expected,
                    error,
                })
            }
        };

        let expected = loaded.expected;
        if equivalent(&expected, &actual) {
            CaseOutcome::Passed { expected, actual }
        } else {
            CaseOutcome::Failed(Failure::Mismatch { expected, actual })
        }
    }
}

fn base_dir(manifest: &Path) -> PathBuf {
    manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
