//! Line encoding for extracted statements.
//!
//! A statement's object is exactly one of three shapes, each with its own line form:
//!
//! ```text
//! <s> <p> "literal" .
//! <s> <p> <iri> .
//! <s> <p> "literal"^^<datatype> .
//! ```
//!
//! Literals are written verbatim, with no escaping, because the expected fixtures
//! are written the same way.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::ProcessorError;

/// The object position of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripleObject {
    PlainLiteral(String),
    IriReference(String),
    TypedLiteral { value: String, datatype: String },
}

impl TripleObject {
    /// Renders the object as it appears in a line.
    pub fn encode(&self) -> String {
        match self {
            TripleObject::PlainLiteral(value) => format!("\"{value}\""),
            TripleObject::IriReference(iri) => format!("<{iri}>"),
            TripleObject::TypedLiteral { value, datatype } => {
                format!("\"{value}\"^^<{datatype}>")
            }
        }
    }

    /// Reads the processor's JSON object shape: a bare string, `{"@iri": ..}`, or
    /// `{"@literal": .., "@datatype": ..}`.
    pub fn from_json(value: &Value) -> Result<Self, ProcessorError> {
        if let Some(literal) = value.as_str() {
            return Ok(TripleObject::PlainLiteral(literal.to_string()));
        }
        let Some(map) = value.as_object() else {
            return Err(malformed(format!("statement object must be a string or an object, got {value}")));
        };
        if let Some(iri) = map.get("@iri") {
            return string_field(iri, "@iri").map(TripleObject::IriReference);
        }
        match (map.get("@literal"), map.get("@datatype")) {
            (Some(literal), Some(datatype)) => Ok(TripleObject::TypedLiteral {
                value: string_field(literal, "@literal")?,
                datatype: string_field(datatype, "@datatype")?,
            }),
            _ => Err(malformed(format!(
                "statement object needs `@iri` or `@literal` with `@datatype`, got {value}"
            ))),
        }
    }
}

impl fmt::Display for TripleObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// One subject / predicate / object statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub subject: String,
    pub predicate: String,
    pub object: TripleObject,
}

impl Statement {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: TripleObject) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// Renders the statement as a single line.
    pub fn to_line(&self) -> String {
        encode_line(&self.subject, &self.predicate, &self.object)
    }

    /// Reads one statement from the processor's JSON output.
    pub fn from_json(value: &Value) -> Result<Self, ProcessorError> {
        let field = |name: &str| {
            value
                .get(name)
                .ok_or_else(|| malformed(format!("statement is missing `{name}`: {value}")))
        };
        Ok(Statement {
            subject: string_field(field("subject")?, "subject")?,
            predicate: string_field(field("predicate")?, "predicate")?,
            object: TripleObject::from_json(field("object")?)?,
        })
    }
}

/// Encodes one statement as a line. This is the callback the dispatcher hands to
/// the processor's `triples` operation.
pub fn encode_line(subject: &str, predicate: &str, object: &TripleObject) -> String {
    format!("<{subject}> <{predicate}> {} .", object.encode())
}

static LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^<([^>]*)>\s+<([^>]*)>\s+(?:<([^>]*)>|"(.*)"\^\^<([^>]*)>|"(.*)")\s*\.$"#,
    )
    .expect("statement line pattern is valid")
});

/// Decodes a line produced by [`encode_line`]. Returns `None` for anything that is
/// not a statement line, including comments and blank lines.
pub fn decode_line(line: &str) -> Option<Statement> {
    let caps = LINE.captures(line.trim())?;
    let object = if let Some(iri) = caps.get(3) {
        TripleObject::IriReference(iri.as_str().to_string())
    } else if let (Some(value), Some(datatype)) = (caps.get(4), caps.get(5)) {
        TripleObject::TypedLiteral {
            value: value.as_str().to_string(),
            datatype: datatype.as_str().to_string(),
        }
    } else {
        TripleObject::PlainLiteral(caps.get(6)?.as_str().to_string())
    };
    Some(Statement {
        subject: caps[1].to_string(),
        predicate: caps[2].to_string(),
        object,
    })
}

fn string_field(value: &Value, name: &str) -> Result<String, ProcessorError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| malformed(format!("`{name}` must be a string, got {value}")))
}

fn malformed(message: String) -> ProcessorError {
    ProcessorError::MalformedOutput { message }
}
