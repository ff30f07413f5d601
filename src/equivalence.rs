//! Decides whether an actual processor output matches the expected fixture.
//!
//! Documents compare by deep value equality (object key order never matters).
//! Statement serializations compare by canonical form: comment and blank lines
//! dropped, each line trimmed, lines sorted and joined with `\n`.

use serde_json::Value;

use crate::fixture::Expected;

/// What the dispatcher got back from the processor.
#[derive(Debug, Clone, PartialEq)]
pub enum Actual {
    Document(Value),
    /// Newline-joined statement lines, in whatever order the processor visited them.
    Statements(String),
}

impl Actual {
    /// The text shown in reports: pretty JSON, or the canonical statement form.
    pub fn render(&self) -> String {
        match self {
            Actual::Document(value) => render_document(value),
            Actual::Statements(text) => canonicalize(text),
        }
    }
}

impl Expected {
    /// The text shown in reports, rendered the same way as [`Actual::render`].
    pub fn render(&self) -> String {
        match self {
            Expected::Document(value) => render_document(value),
            Expected::Lines(lines) => canonicalize_lines(lines.iter().map(String::as_str)),
        }
    }
}

fn render_document(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Compares `actual` against `expected` under the rules of the expected format.
/// A document never matches a statement serialization.
pub fn equivalent(expected: &Expected, actual: &Actual) -> bool {
    match (expected, actual) {
        (Expected::Document(expected), Actual::Document(actual)) => documents_equal(expected, actual),
        (Expected::Lines(lines), Actual::Statements(text)) => {
            canonicalize_lines(lines.iter().map(String::as_str)) == canonicalize(text)
        }
        _ => false,
    }
}

/// Deep structural equality of two documents.
pub fn documents_equal(expected: &Value, actual: &Value) -> bool {
    expected == actual
}

/// Canonical form of a statement serialization given as one string.
pub fn canonicalize(text: &str) -> String {
    canonicalize_lines(text.lines())
}

/// Canonical form of a statement serialization given as lines.
pub fn canonicalize_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut kept: Vec<&str> = lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    kept.sort_unstable();
    kept.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const X: &str = "<http://example.com/a> <http://example.com/b> \"x\" .";
    const Y: &str = "<http://example.com/c> <http://example.com/d> <http://example.com/e> .";

    fn lines(text: &str) -> Expected {
        Expected::Lines(text.lines().map(str::to_string).collect())
    }

    #[test]
    fn documents_ignore_key_order() {
        let a: Value = serde_json::from_str(r#"{"@id": "ex:a", "ex:b": [1, {"x": true, "y": null}]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"ex:b": [1, {"y": null, "x": true}], "@id": "ex:a"}"#).unwrap();
        assert!(documents_equal(&a, &b));
        assert!(documents_equal(&b, &a));
        assert!(documents_equal(&a, &a));
    }

    #[test]
    fn documents_respect_array_order_and_types() {
        assert!(!documents_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!documents_equal(&json!({"a": "1"}), &json!({"a": 1})));
        assert!(!documents_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn canonical_form_drops_comments_blanks_and_whitespace() {
        let text = format!("# header\n\n   {Y}   \n\t{X}\n   \n# trailing");
        assert_eq!(canonicalize(&text), format!("{X}\n{Y}"));
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let text = format!("{Y}\n# c\n {X} \n");
        let once = canonicalize(&text);
        assert_eq!(canonicalize(&once), once);
    }

    #[test]
    fn only_comments_canonicalize_to_empty() {
        let expected = lines("# nothing here\n\n   \n# still nothing");
        assert_eq!(expected.render(), "");
        assert!(equivalent(&expected, &Actual::Statements(String::new())));
        assert!(!equivalent(&expected, &Actual::Statements(X.to_string())));
    }

    #[test]
    fn statements_match_regardless_of_order() {
        let expected = lines(&format!("# generated\n\n{Y}\n\n{X}\n"));
        let actual = Actual::Statements(format!("{X}\n{Y}"));
        assert!(equivalent(&expected, &actual));
    }

    #[test]
    fn typed_and_plain_literals_differ() {
        let plain = "<http://example.com/a> <http://example.com/b> \"5\" .";
        let typed = "<http://example.com/a> <http://example.com/b> \"5\"^^<http://www.w3.org/2001/XMLSchema#integer> .";
        assert!(!equivalent(&lines(plain), &Actual::Statements(typed.to_string())));
    }

    #[test]
    fn formats_never_cross_match() {
        assert!(!equivalent(&Expected::Document(json!("")), &Actual::Statements(String::new())));
        assert!(!equivalent(&lines(""), &Actual::Document(json!(""))));
    }

    #[test]
    fn render_uses_canonical_statements() {
        let actual = Actual::Statements(format!("{Y}\n{X}"));
        assert_eq!(actual.render(), format!("{X}\n{Y}"));
        assert_eq!(Actual::Document(json!({"a": 1})).render(), "{\n  \"a\": 1\n}");
    }
}
