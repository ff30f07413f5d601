//! Test manifests and the cases they declare.
//!
//! A manifest is a JSON document:
//!
//! ```json
//! {
//!   "group": "compaction",
//!   "tests": [
//!     { "name": "drop null", "type": "compact",
//!       "input": "compact-0001-in.json", "context": "compact-0001-context.json",
//!       "expect": "compact-0001-out.json" }
//!   ]
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::errors::FixtureError;
use crate::fixture;

/// A named group of test cases loaded from one manifest file.
#[derive(Debug, Clone, Deserialize)]
pub struct TestManifest {
    pub group: String,
    pub tests: Vec<TestCase>,
}

impl TestManifest {
    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        fixture::read_json(path)
    }
}

/// One declarative conformance check.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(rename = "type")]
    pub operation: OperationKind,
    pub input: PathBuf,
    pub expect: PathBuf,
    #[serde(default)]
    pub context: Option<PathBuf>,
    #[serde(default)]
    pub frame: Option<PathBuf>,
}

impl TestCase {
    /// The format the expected output is parsed and compared in, decided by the
    /// `expect` file's extension.
    pub fn expect_format(&self) -> ExpectFormat {
        ExpectFormat::from_path(&self.expect)
    }
}

/// The processor operation a case exercises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    Normalize,
    Expand,
    Compact,
    Frame,
    Triples,
    /// Any `type` outside the fixed set. Such cases are skipped, never run.
    Unrecognized(String),
}

impl OperationKind {
    pub fn parse(name: &str) -> Self {
        match name {
            "normalize" => OperationKind::Normalize,
            "expand" => OperationKind::Expand,
            "compact" => OperationKind::Compact,
            "frame" => OperationKind::Frame,
            "triples" => OperationKind::Triples,
            other => OperationKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OperationKind::Normalize => "normalize",
            OperationKind::Expand => "expand",
            OperationKind::Compact => "compact",
            OperationKind::Frame => "frame",
            OperationKind::Triples => "triples",
            OperationKind::Unrecognized(name) => name,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, OperationKind::Unrecognized(_))
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OperationKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(OperationKind::parse(&name))
    }
}

/// How an expected-output fixture is parsed and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectFormat {
    /// `.json`: a document, compared structurally.
    Json,
    /// Anything else: statement lines, compared after canonicalization.
    Triples,
}

impl ExpectFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext == "json" => ExpectFormat::Json,
            _ => ExpectFormat::Triples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_manifest_with_optional_fields() {
        let manifest: TestManifest = serde_json::from_str(
            r#"{
                "group": "compaction",
                "tests": [
                    {"name": "a", "type": "compact", "input": "in.json",
                     "context": "ctx.json", "expect": "out.json"},
                    {"name": "b", "type": "triples", "input": "in.json", "expect": "out.nt"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(manifest.group, "compaction");
        assert_eq!(manifest.tests.len(), 2);
        assert_eq!(manifest.tests[0].operation, OperationKind::Compact);
        assert_eq!(manifest.tests[0].context, Some(PathBuf::from("ctx.json")));
        assert_eq!(manifest.tests[1].frame, None);
        assert_eq!(manifest.tests[1].expect_format(), ExpectFormat::Triples);
    }

    #[test]
    fn unknown_type_is_kept_not_rejected() {
        let case: TestCase = serde_json::from_str(
            r#"{"name": "x", "type": "foobar", "input": "i.json", "expect": "o.json"}"#,
        )
        .unwrap();
        assert_eq!(case.operation, OperationKind::Unrecognized("foobar".into()));
        assert!(!case.operation.is_recognized());
        assert_eq!(case.operation.to_string(), "foobar");
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let result = serde_json::from_str::<TestCase>(r#"{"name": "x", "type": "expand"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn expect_format_follows_extension() {
        assert_eq!(ExpectFormat::from_path(Path::new("a/out.json")), ExpectFormat::Json);
        assert_eq!(ExpectFormat::from_path(Path::new("a/out.nt")), ExpectFormat::Triples);
        assert_eq!(ExpectFormat::from_path(Path::new("a/out")), ExpectFormat::Triples);
        assert_eq!(ExpectFormat::from_path(Path::new("out.JSON.nt")), ExpectFormat::Triples);
    }

    #[test]
    fn operation_names_round_trip() {
        for name in ["normalize", "expand", "compact", "frame", "triples"] {
            let kind = OperationKind::parse(name);
            assert!(kind.is_recognized());
            assert_eq!(kind.as_str(), name);
        }
    }
}
