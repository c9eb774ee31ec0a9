//! Tests for the document codec

use pretty_assertions::assert_eq;
use rstest::rstest;
use rulekit_content::{Document, Metadata, ParseErrorKind, Value, marshal, split};

const RULE: &str = "---\ndescription: TypeScript style\napply_to:\n  - \"**/*.ts\"\n  - \"**/*.tsx\"\npriority: 2\n---\n\nPrefer strict mode.\n";

#[test]
fn split_reads_header_and_body() {
    let (metadata, body) = split(RULE.as_bytes()).unwrap();
    assert_eq!(metadata.description(), Some("TypeScript style"));
    assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["description", "apply_to", "priority"]);
    assert_eq!(metadata.get("priority"), Some(&Value::from(2)));
    assert_eq!(body, "Prefer strict mode.");
}

#[test]
fn empty_body_is_valid() {
    let (metadata, body) = split(b"---\ndescription: only header\n---\n").unwrap();
    assert_eq!(metadata.len(), 1);
    assert_eq!(body, "");
}

#[test]
fn empty_header_is_valid() {
    let (metadata, body) = split(b"---\n---\nbody text").unwrap();
    assert!(metadata.is_empty());
    assert_eq!(body, "body text");
}

#[rstest]
#[case::no_header("just some text")]
#[case::single_delimiter("---\ndescription: x\nno closing delimiter")]
#[case::empty("")]
fn missing_delimiters_are_malformed(#[case] input: &str) {
    let err = split(input.as_bytes()).unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::MalformedHeader));
}

#[rstest]
#[case::bad_yaml("---\ndescription: [unclosed\n---\nbody")]
#[case::list_header("---\n- a\n- b\n---\nbody")]
#[case::scalar_header("---\nplain words\n---\nbody")]
fn undecodable_header_is_invalid_metadata(#[case] input: &str) {
    let err = split(input.as_bytes()).unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::InvalidMetadata));
}

#[test]
fn non_utf8_input_is_rejected() {
    let err = split(b"---\ndescription: \xff\xfe\n---\nbody").unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::InvalidEncoding));
}

#[test]
fn body_may_contain_delimiters() {
    let (_, body) = split(b"---\na: 1\n---\nbefore\n---\nafter").unwrap();
    assert_eq!(body, "before\n---\nafter");
}

#[test]
fn marshal_output_layout() {
    let mut metadata = Metadata::new();
    metadata.insert("description", "TypeScript style");
    metadata.insert("alwaysApply", true);
    metadata.insert("tags", vec!["style", "typescript"]);

    let out = String::from_utf8(marshal(&metadata, "Prefer strict mode.").unwrap()).unwrap();
    insta::assert_snapshot!(out, @r"
    ---
    description: TypeScript style
    alwaysApply: true
    tags:
    - style
    - typescript
    ---

    Prefer strict mode.
    ");
}

#[test]
fn marshal_is_stable_across_calls() {
    let (metadata, body) = split(RULE.as_bytes()).unwrap();
    let first = marshal(&metadata, &body).unwrap();
    let second = marshal(&metadata, &body).unwrap();
    assert_eq!(first, second);
}

#[test]
fn reparse_normalizes_once() {
    let doc = Document::parse(RULE.as_bytes()).unwrap();
    let once = doc.to_bytes().unwrap();
    let twice = Document::parse(&once).unwrap().to_bytes().unwrap();
    assert_eq!(once, twice);
    assert_eq!(Document::parse(&once).unwrap(), doc);
}
