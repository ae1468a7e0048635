use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn parse(doc: &str) -> Result<DirectiveSet, DirectiveError> {
    DirectiveSet::parse(doc, DEFAULT_MARKER)
}

#[test]
fn test_nested_parens_preserved() {
    let set = parse("@tag code(if (a(b)) { return c; })").unwrap_or_default();
    assert_eq!(
        set.body_override(),
        Some(BodyOverride::Code("if (a(b)) { return c; }"))
    );
}

#[test]
fn test_nothing_after_close_paren_consumed() {
    let set = parse("@tag macro(f(x)) trailing (text) @tag root").unwrap_or_default();
    assert_eq!(set.get(DirectiveKey::Macro), Some("f(x)"));
    assert!(set.is_root());
    assert_eq!(set.root_name(), None);
}

#[test]
fn test_no_directives() {
    let set = parse("Sweeps the heap.\n@param x the size").unwrap_or_else(|e| panic!("{e}"));
    assert!(set.is_empty());
    assert!(!set.skips_body());
}

#[test]
fn test_value_is_trimmed_and_multiline() {
    let set = parse("Doc.\n@tag code(\n    return 1;\n)\n").unwrap_or_default();
    assert_eq!(set.get(DirectiveKey::Code), Some("return 1;"));
}

#[test]
fn test_root_with_exported_name() {
    let set = parse("@tag root(collectGarbage)").unwrap_or_default();
    assert_eq!(set.root_name(), Some("collectGarbage"));
}

#[test]
fn test_proxy_value_optional() {
    let set = parse("@tag proxy").unwrap_or_default();
    assert_eq!(set.body_override(), Some(BodyOverride::Proxy("")));
    let named = parse("@tag proxy(memcpy)").unwrap_or_default();
    assert_eq!(named.body_override(), Some(BodyOverride::Proxy("memcpy")));
}

#[test]
fn test_implementers_split_on_whitespace() {
    let set = parse("@tag implementers(a.Leaf  a.Other\n a.Third)").unwrap_or_default();
    let names: Vec<&str> = set.implementers().map(Iterator::collect).unwrap_or_default();
    assert_eq!(names, vec!["a.Leaf", "a.Other", "a.Third"]);
    assert!(set.skips_body());
}

#[test]
fn test_marker_prefix_of_word_is_text() {
    let set = parse("see @tagline for details").unwrap_or_else(|e| panic!("{e}"));
    assert!(set.is_empty());
}

#[test]
fn test_last_repeated_key_wins() {
    let set = parse("@tag code(a) @tag code(b)").unwrap_or_default();
    assert_eq!(set.get(DirectiveKey::Code), Some("b"));
}

#[test]
fn test_custom_marker() {
    let set = DirectiveSet::parse("@vm root", "@vm").unwrap_or_default();
    assert!(set.is_root());
}

#[test]
fn test_empty_marker_finds_nothing() {
    let set = DirectiveSet::parse("x @tag root", "").unwrap_or_default();
    assert!(set.is_empty());
}

#[test]
fn test_unknown_key() {
    assert_eq!(
        parse("@tag inline"),
        Err(DirectiveError::UnknownKey {
            key: "inline".to_owned()
        })
    );
}

#[test]
fn test_missing_value() {
    let err = parse("@tag code").err();
    assert_eq!(
        err,
        Some(DirectiveError::MissingValue {
            key: DirectiveKey::Code
        })
    );
    assert_eq!(err.map(|e| e.code()), Some(ErrorCode::E0003));
}

#[test]
fn test_unbalanced_value() {
    let err = parse("@tag code(if (x) { return 1; }").err();
    assert!(matches!(err, Some(DirectiveError::Malformed { .. })));
    assert_eq!(err.map(|e| e.code()), Some(ErrorCode::E0001));
}

#[test]
fn test_missing_key() {
    assert!(matches!(
        parse("@tag (x)"),
        Err(DirectiveError::Malformed { .. })
    ));
}

#[test]
fn test_conflicting_overrides() {
    let err = parse("@tag code(return 1;) @tag proxy").err();
    assert_eq!(
        err.map(|e| e.to_string()),
        Some("malformed directive: conflicting body overrides `code`, `proxy`".to_owned())
    );
}

#[test]
fn test_remove() {
    let mut set = parse("@tag implementers(a.B)").unwrap_or_default();
    set.remove(DirectiveKey::Implementers);
    assert!(set.is_empty());
}

proptest! {
    /// Any balanced value is extracted verbatim (modulo trimming) and the
    /// text after it is left for the next directive.
    #[test]
    fn balanced_values_roundtrip(inner in "[a-z ;{}]{0,8}", depth in 0usize..4, tail in "[a-z .]{0,12}") {
        let mut value = inner.trim().to_owned();
        for _ in 0..depth {
            value = format!("f({value})");
        }
        let doc = format!("@tag code({value}) {tail}");
        let set = parse(&doc).unwrap_or_default();
        prop_assert_eq!(set.get(DirectiveKey::Code), Some(value.as_str()));
    }
}
