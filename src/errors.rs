//! Error types for the harness.
//!
//! Three families, each a `thiserror` enum that is also a `miette` diagnostic:
//!
//! - [`HarnessError`]: configuration and reporting failures. These abort the run.
//! - [`FixtureError`]: a manifest or fixture file that is missing, unreadable or malformed.
//!   Inside a case these are isolated to that case.
//! - [`ProcessorError`]: the processor under test failed to produce an output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// CONFIGURATION / RUN ERRORS
// ============================================================================

/// Errors that stop the whole run before (or while) tests execute.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("No test file or directory specified.")]
    #[diagnostic(
        code(ldcheck::config::no_input),
        help("pass a manifest with --file or a directory of manifests with --directory")
    )]
    NoInput,

    #[error("Invalid test file: {}", .path.display())]
    #[diagnostic(code(ldcheck::config::invalid_file))]
    InvalidTestFile { path: PathBuf },

    #[error("Invalid test directory: {}", .path.display())]
    #[diagnostic(code(ldcheck::config::invalid_directory))]
    InvalidTestDirectory { path: PathBuf },

    #[error("No tests found. Looked for `*.{suffix}` manifests.")]
    #[diagnostic(
        code(ldcheck::config::no_tests),
        help("manifests are discovered by their file extension, see --suffix")
    )]
    NoTestsFound { suffix: String },

    #[error("Failed to walk directory {}: {source}", .root.display())]
    #[diagnostic(code(ldcheck::config::walk))]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to write report: {0}")]
    #[diagnostic(code(ldcheck::report::io))]
    Report(#[from] std::io::Error),
}

impl HarnessError {
    /// True for the errors that come from how the harness was invoked.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, HarnessError::Report(_))
    }
}

// ============================================================================
// FIXTURE ERRORS
// ============================================================================

/// A manifest or fixture file could not be turned into a value.
#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    #[error("File not found: {}", .path.display())]
    #[diagnostic(code(ldcheck::fixture::not_found))]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    #[diagnostic(code(ldcheck::fixture::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", .path.display())]
    #[diagnostic(code(ldcheck::fixture::parse))]
    Parse {
        path: PathBuf,
        message: String,
        #[source_code]
        src: Arc<NamedSource<String>>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("{operation} test '{test}' has no `{field}` file")]
    #[diagnostic(
        code(ldcheck::fixture::missing_reference),
        help("compact tests need a `context` file and frame tests a `frame` file")
    )]
    MissingReference {
        test: String,
        operation: String,
        field: &'static str,
    },
}

impl FixtureError {
    /// Maps an io error on `path` to `NotFound` or `Read`.
    pub(crate) fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FixtureError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            FixtureError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Builds a `Parse` error pointing at the location serde_json reported.
    pub(crate) fn from_json(path: &Path, text: String, err: &serde_json::Error) -> Self {
        let offset = byte_offset(&text, err.line(), err.column());
        let len = usize::from(offset < text.len());
        FixtureError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
            src: Arc::new(NamedSource::new(path.display().to_string(), text)),
            span: SourceSpan::new(offset.into(), len),
        }
    }
}

/// Converts serde_json's 1-based line / column into a byte offset into `text`.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}

// ============================================================================
// PROCESSOR ERRORS
// ============================================================================

/// The processor under test did not produce an output.
#[derive(Debug, Error, Diagnostic)]
pub enum ProcessorError {
    #[error("No processor configured")]
    #[diagnostic(
        code(ldcheck::processor::unconfigured),
        help("pass the processor executable with --processor")
    )]
    Unconfigured,

    #[error("Failed to start processor '{program}': {source}")]
    #[diagnostic(code(ldcheck::processor::spawn))]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Processor I/O failed: {0}")]
    #[diagnostic(code(ldcheck::processor::io))]
    Io(#[from] std::io::Error),

    #[error("Processor '{program}' exited with {status}: {stderr}")]
    #[diagnostic(code(ldcheck::processor::exit))]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Processor returned malformed output: {message}")]
    #[diagnostic(code(ldcheck::processor::malformed_output))]
    MalformedOutput { message: String },

    /// Returned by in-process [`Processor`](crate::processor::Processor) implementations.
    #[error("{operation} failed: {message}")]
    #[diagnostic(code(ldcheck::processor::failed))]
    Failed { operation: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_offset_counts_previous_lines() {
        let text = "{\n  \"a\": x\n}";
        // line 2, column 8 is the `x`
        assert_eq!(&text[byte_offset(text, 2, 8)..byte_offset(text, 2, 8) + 1], "x");
    }

    #[test]
    fn byte_offset_is_clamped_to_text() {
        assert_eq!(byte_offset("abc", 9, 9), 3);
        assert_eq!(byte_offset("abc", 0, 4), 0);
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = FixtureError::from_io(
            Path::new("missing.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, FixtureError::NotFound { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn json_parse_error_keeps_source() {
        let text = "{\"group\": }".to_string();
        let err = serde_json::from_str::<serde_json::Value>(&text).unwrap_err();
        let fixture = FixtureError::from_json(Path::new("bad.test"), text, &err);
        match fixture {
            FixtureError::Parse { span, message, .. } => {
                assert!(span.offset() > 0 && span.offset() <= 11);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn no_tests_found_names_the_suffix() {
        let err = HarnessError::NoTestsFound {
            suffix: "jsonld-test".into(),
        };
        assert_eq!(err.to_string(), "No tests found. Looked for `*.jsonld-test` manifests.");
    }

    #[test]
    fn missing_reference_names_the_operation() {
        let err = FixtureError::MissingReference {
            test: "drop null".into(),
            operation: "compact".into(),
            field: "context",
        };
        assert_eq!(err.to_string(), "compact test 'drop null' has no `context` file");
    }

    #[test]
    fn report_errors_are_not_configuration_errors() {
        let io = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
        assert!(!HarnessError::Report(io).is_configuration());
        assert!(HarnessError::NoInput.is_configuration());
    }
}
