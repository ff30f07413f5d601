//! The processor under test.
//!
//! The harness never implements normalize/expand/compact/frame/triples itself; it
//! drives whatever [`Processor`] it is given. [`CommandProcessor`] adapts an external
//! executable speaking a one-request-per-process JSON protocol on stdin/stdout.

use std::io::{self, ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::errors::ProcessorError;
use crate::triples::{Statement, TripleObject};

/// Receives one extracted statement as `(subject, predicate, object)`.
pub type StatementSink<'a> = dyn FnMut(&str, &str, &TripleObject) + 'a;

/// The five operations of a JSON-LD style processor.
pub trait Processor {
    fn normalize(&self, input: &Value) -> Result<Value, ProcessorError>;

    fn expand(&self, input: &Value) -> Result<Value, ProcessorError>;

    fn compact(&self, context: &Value, input: &Value) -> Result<Value, ProcessorError>;

    fn frame(&self, input: &Value, frame: &Value) -> Result<Value, ProcessorError>;

    /// Calls `sink` once per statement extracted from `input`, in any order.
    fn triples(&self, input: &Value, sink: &mut StatementSink<'_>) -> Result<(), ProcessorError>;
}

/// Stands in when no processor was configured. Every call fails, so cases are
/// still loaded and reported but none can pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredProcessor;

impl Processor for UnconfiguredProcessor {
    fn normalize(&self, _input: &Value) -> Result<Value, ProcessorError> {
        Err(ProcessorError::Unconfigured)
    }

    fn expand(&self, _input: &Value) -> Result<Value, ProcessorError> {
        Err(ProcessorError::Unconfigured)
    }

    fn compact(&self, _context: &Value, _input: &Value) -> Result<Value, ProcessorError> {
        Err(ProcessorError::Unconfigured)
    }

    fn frame(&self, _input: &Value, _frame: &Value) -> Result<Value, ProcessorError> {
        Err(ProcessorError::Unconfigured)
    }

    fn triples(&self, _input: &Value, _sink: &mut StatementSink<'_>) -> Result<(), ProcessorError> {
        Err(ProcessorError::Unconfigured)
    }
}

/// Runs an external processor once per operation.
///
/// The request is written to stdin as
/// `{"operation": .., "document": .., "context"?: .., "frame"?: ..}` and the response
/// read from stdout: the output document, or for `triples` an array of
/// `{"subject", "predicate", "object"}` records.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandProcessor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn call(&self, operation: &str, document: &Value, extra: Option<(&str, &Value)>) -> Result<Value, ProcessorError> {
        let mut request = Map::new();
        request.insert("operation".into(), json!(operation));
        request.insert("document".into(), document.clone());
        if let Some((key, value)) = extra {
            request.insert(key.into(), value.clone());
        }
        let payload = serde_json::to_vec(&Value::Object(request)).map_err(|e| {
            ProcessorError::MalformedOutput {
                message: format!("failed to encode request: {e}"),
            }
        })?;

        debug!(program = %self.program.display(), operation, "invoking processor");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessorError::Spawn {
                program: self.program_name(),
                source,
            })?;

        // The request is written on its own thread so a processor that answers while
        // still reading cannot fill the stdout or stderr pipe and stall both sides.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|s| {
            let writer = s.spawn(move || match stdin {
                // Dropping stdin at the end of the closure closes the request.
                Some(mut stdin) => stdin.write_all(&payload),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("request writer panicked")));
            (written, output)
        });
        match written {
            // A processor may answer without reading its request.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!(operation, "processor closed stdin before reading the request");
            }
            other => other?,
        }

        let output = output?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            debug!(operation, stderr = %stderr, "processor stderr");
        }
        if !output.status.success() {
            return Err(ProcessorError::Exit {
                program: self.program_name(),
                status: output.status,
                stderr,
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| ProcessorError::MalformedOutput {
            message: format!("{operation} response is not JSON: {e}"),
        })
    }
}

impl Processor for CommandProcessor {
    fn normalize(&self, input: &Value) -> Result<Value, ProcessorError> {
        self.call("normalize", input, None)
    }

    fn expand(&self, input: &Value) -> Result<Value, ProcessorError> {
        self.call("expand", input, None)
    }

    fn compact(&self, context: &Value, input: &Value) -> Result<Value, ProcessorError> {
        self.call("compact", input, Some(("context", context)))
    }

    fn frame(&self, input: &Value, frame: &Value) -> Result<Value, ProcessorError> {
        self.call("frame", input, Some(("frame", frame)))
    }

    fn triples(&self, input: &Value, sink: &mut StatementSink<'_>) -> Result<(), ProcessorError> {
        let response = self.call("triples", input, None)?;
        let Value::Array(records) = response else {
            return Err(ProcessorError::MalformedOutput {
                message: "triples response must be an array of statements".to_string(),
            });
        };
        for record in &records {
            let statement = Statement::from_json(record)?;
            sink(&statement.subject, &statement.predicate, &statement.object);
        }
        Ok(())
    }
}
