//! Console report output.
//!
//! Everything the runner prints goes through a [`Reporter`] over any
//! [`WriteColor`] sink, so the same code writes to a terminal or to a
//! `termcolor::Buffer` in tests.

use std::io::{self, Write};
use std::path::Path;

use difference::{Changeset, Difference};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::runner::{CaseOutcome, Failure, SkipReason, Tally};

/// Identifies a case in its progress line.
#[derive(Debug, Clone, Copy)]
pub struct CaseLabel<'a> {
    pub group: &'a str,
    pub index: usize,
    pub total: usize,
    pub name: &'a str,
}

pub struct Reporter<W> {
    out: W,
    verbose: bool,
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "ldcheck TestRunner")?;
        writeln!(self.out, "Use -h or --help to view options.")
    }

    /// Prints the progress line for one finished case, plus whatever the outcome
    /// calls for: values on failure (or on pass when verbose), a notice on skip.
    pub fn case(&mut self, label: CaseLabel<'_>, outcome: &CaseOutcome) -> io::Result<()> {
        write!(
            self.out,
            "Test: {} {:04}/{:04} {}... ",
            label.group, label.index, label.total, label.name
        )?;
        match outcome {
            CaseOutcome::Passed { expected, actual } => {
                self.status("PASS", Color::Green)?;
                writeln!(self.out)?;
                if self.verbose {
                    self.values(&expected.render(), &actual.render())?;
                }
            }
            CaseOutcome::Failed(failure) => {
                self.status("FAIL", Color::Red)?;
                writeln!(self.out)?;
                self.failure(failure)?;
            }
            CaseOutcome::Skipped(reason) => {
                self.status("SKIP", Color::Yellow)?;
                writeln!(self.out)?;
                match reason {
                    SkipReason::UnknownOperation(_) => writeln!(self.out, "Unknown test type.")?,
                    SkipReason::Filtered(why) => writeln!(self.out, "  ({why})")?,
                }
            }
        }
        Ok(())
    }

    /// Reports a manifest that could not be loaded.
    pub fn broken_manifest(&mut self, path: &Path, error: &dyn Diagnostic) -> io::Result<()> {
        self.status("BROKEN", Color::Red)?;
        writeln!(self.out, " manifest {}", path.display())?;
        self.diagnostic(error)
    }

    pub fn summary(&mut self, tally: &Tally) -> io::Result<()> {
        writeln!(
            self.out,
            "Tests run: {}, Tests passed: {}, Tests Failed: {}",
            tally.run, tally.passed, tally.failed
        )?;
        if tally.skipped > 0 {
            writeln!(self.out, "Tests skipped: {}", tally.skipped)?;
        }
        if tally.broken_manifests > 0 {
            writeln!(self.out, "Broken manifests: {}", tally.broken_manifests)?;
        }
        self.out.flush()
    }

    // ------------------------------------------------------------------------
    // helpers
    // ------------------------------------------------------------------------

    fn failure(&mut self, failure: &Failure) -> io::Result<()> {
        match failure {
            Failure::Mismatch { expected, actual } => {
                let (expected, actual) = (expected.render(), actual.render());
                self.values(&expected, &actual)?;
                writeln!(self.out, "Diff:")?;
                self.diff(&expected, &actual)
            }
            Failure::Processor { expected, error } => {
                writeln!(self.out, "Expect:\n{}", expected.render())?;
                writeln!(self.out, "Result:\n(no output)")?;
                self.diagnostic(error)
            }
            Failure::Fixture(error) => self.diagnostic(error),
        }
    }

    fn values(&mut self, expected: &str, actual: &str) -> io::Result<()> {
        writeln!(self.out, "Expect:\n{expected}")?;
        writeln!(self.out, "Result:\n{actual}")
    }

    fn status(&mut self, text: &str, color: Color) -> io::Result<()> {
        self.out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "{text}")?;
        self.out.reset()
    }

    fn diff(&mut self, expected: &str, actual: &str) -> io::Result<()> {
        let changeset = Changeset::new(expected, actual, "\n");
        for diff in &changeset.diffs {
            let (prefix, color, text) = match diff {
                Difference::Same(x) => (' ', None, x),
                Difference::Add(x) => ('+', Some(Color::Red), x),
                Difference::Rem(x) => ('-', Some(Color::Green), x),
            };
            for line in text.lines() {
                self.out.set_color(ColorSpec::new().set_fg(color))?;
                write!(self.out, "{prefix}{line}")?;
                self.out.reset()?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }

    fn diagnostic(&mut self, error: &dyn Diagnostic) -> io::Result<()> {
        let theme = if self.out.supports_color() {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut rendered = String::new();
        match GraphicalReportHandler::new_themed(theme).render_report(&mut rendered, error) {
            Ok(()) => write!(self.out, "{rendered}"),
            Err(_) => writeln!(self.out, "Error: {error}"),
        }
    }
}
