//! ldcheck: a manifest-driven conformance test runner for JSON-LD processors.
//!
//! A run discovers manifest files, loads each case's fixtures, dispatches the
//! case's operation to a [`Processor`](processor::Processor), checks the output
//! against the expected fixture and reports PASS / FAIL per case plus a final tally.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod equivalence;
pub mod errors;
pub mod fixture;
pub mod manifest;
pub mod processor;
pub mod report;
pub mod runner;
pub mod triples;

pub use crate::errors::{FixtureError, HarnessError, ProcessorError};
pub use crate::manifest::{ExpectFormat, OperationKind, TestCase, TestManifest};
pub use crate::processor::{CommandProcessor, Processor};
pub use crate::runner::{CaseOutcome, SuiteRunner, Tally};
