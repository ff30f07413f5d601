//! Shared helpers for the integration tests: an in-process stub processor and a
//! throwaway fixture tree.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use ldcheck::processor::StatementSink;
use ldcheck::triples::Statement;
use ldcheck::{Processor, ProcessorError};
use serde_json::Value;
use tempfile::TempDir;

/// Returns canned outputs per operation and records every call.
#[derive(Default)]
pub struct StubProcessor {
    documents: HashMap<&'static str, Value>,
    statements: Vec<Statement>,
    failures: HashMap<&'static str, String>,
    pub calls: RefCell<Vec<String>>,
}

impl StubProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(mut self, operation: &'static str, output: Value) -> Self {
        self.documents.insert(operation, output);
        self
    }

    pub fn emitting(mut self, statements: Vec<Statement>) -> Self {
        self.statements = statements;
        self
    }

    pub fn failing(mut self, operation: &'static str, message: &str) -> Self {
        self.failures.insert(operation, message.to_string());
        self
    }

    fn answer(&self, operation: &'static str) -> Result<Value, ProcessorError> {
        self.calls.borrow_mut().push(operation.to_string());
        if let Some(message) = self.failures.get(operation) {
            return Err(ProcessorError::Failed {
                operation: operation.to_string(),
                message: message.clone(),
            });
        }
        Ok(self.documents.get(operation).cloned().unwrap_or(Value::Null))
    }
}

impl Processor for StubProcessor {
    fn normalize(&self, _input: &Value) -> Result<Value, ProcessorError> {
        self.answer("normalize")
    }

    fn expand(&self, _input: &Value) -> Result<Value, ProcessorError> {
        self.answer("expand")
    }

    fn compact(&self, _context: &Value, _input: &Value) -> Result<Value, ProcessorError> {
        self.answer("compact")
    }

    fn frame(&self, _input: &Value, _frame: &Value) -> Result<Value, ProcessorError> {
        self.answer("frame")
    }

    fn triples(&self, _input: &Value, sink: &mut StatementSink<'_>) -> Result<(), ProcessorError> {
        self.answer("triples")?;
        for statement in &self.statements {
            sink(&statement.subject, &statement.predicate, &statement.object);
        }
        Ok(())
    }
}

/// A temporary directory of manifests and fixtures.
pub struct SuiteDir {
    dir: TempDir,
}

impl SuiteDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `name` (relative), creating parent directories.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dir");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        self.write(name, &serde_json::to_string_pretty(value).expect("serialize fixture"))
    }
}
