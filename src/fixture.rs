//! Loads the files a test case refers to.
//!
//! Every path in a case is relative to the directory of the manifest that declared it.
//! JSON files are parsed up front; statement files are kept as raw lines and only
//! canonicalized when compared.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::FixtureError;
use crate::manifest::{ExpectFormat, OperationKind, TestCase};

/// The expected output of a case, parsed according to its [`ExpectFormat`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    Document(Value),
    Lines(Vec<String>),
}

impl Expected {
    pub fn format(&self) -> ExpectFormat {
        match self {
            Expected::Document(_) => ExpectFormat::Json,
            Expected::Lines(_) => ExpectFormat::Triples,
        }
    }
}

/// Everything a case needs before it can be dispatched.
#[derive(Debug, Clone)]
pub struct LoadedCase {
    pub input: Value,
    pub expected: Expected,
    pub context: Option<Value>,
    pub frame: Option<Value>,
}

impl LoadedCase {
    /// Loads `case`'s fixtures from `base_dir`.
    ///
    /// `context` is loaded for compact cases and `frame` for frame cases; a case of
    /// either kind that does not name the file fails with
    /// [`FixtureError::MissingReference`].
    pub fn load(case: &TestCase, base_dir: &Path) -> Result<Self, FixtureError> {
        let input = read_json(&base_dir.join(&case.input))?;
        let expected = load_expected(case, base_dir)?;

        let context = match case.operation {
            OperationKind::Compact => {
                Some(read_json(&base_dir.join(required(case, "context", &case.context)?))?)
            }
            _ => None,
        };
        let frame = match case.operation {
            OperationKind::Frame => {
                Some(read_json(&base_dir.join(required(case, "frame", &case.frame)?))?)
            }
            _ => None,
        };

        Ok(LoadedCase {
            input,
            expected,
            context,
            frame,
        })
    }
}

fn load_expected(case: &TestCase, base_dir: &Path) -> Result<Expected, FixtureError> {
    let path = base_dir.join(&case.expect);
    match case.expect_format() {
        ExpectFormat::Json => read_json(&path).map(Expected::Document),
        ExpectFormat::Triples => read_lines(&path).map(Expected::Lines),
    }
}

fn required<'a>(
    case: &TestCase,
    field: &'static str,
    value: &'a Option<PathBuf>,
) -> Result<&'a Path, FixtureError> {
    value
        .as_deref()
        .ok_or_else(|| FixtureError::MissingReference {
            test: case.name.clone(),
            operation: case.operation.to_string(),
            field,
        })
}

/// Reads and parses a JSON file into `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FixtureError> {
    let text = read_text(path)?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(err) => Err(FixtureError::from_json(path, text, &err)),
    }
}

/// Reads a statement file as raw lines, untouched.
pub fn read_lines(path: &Path) -> Result<Vec<String>, FixtureError> {
    Ok(read_text(path)?.lines().map(str::to_string).collect())
}

fn read_text(path: &Path) -> Result<String, FixtureError> {
    fs::read_to_string(path).map_err(|e| FixtureError::from_io(path, e))
}
