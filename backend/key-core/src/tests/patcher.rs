// Unit tests for the literal replacement (pure string in, string out)
// File-level behavior is covered in integration_tests/patcher.rs

use crate::error::PatchError;
use crate::patcher::{PatchOutcome, replace_key_literal};

const SOURCE: &str = "import x from 'y';\n\nfunction connect() {\n  const apiKey = 'ek_old123'; // expired\n  return apiKey;\n}\n";

/// **VALUE**: Verifies the literal is replaced and nothing else changes.
///
/// **BUG THIS CATCHES**: A greedy pattern (`'.+'`) would swallow the trailing
/// comment or other quoted strings on the line.
#[test]
fn given_matching_literal_when_replaced_then_only_literal_changes() {
    let (outcome, updated) =
        replace_key_literal(SOURCE, "apiKey", "ek_new456").expect("replace should work");

    assert_eq!(outcome, PatchOutcome::Updated);
    assert_eq!(updated, SOURCE.replace("ek_old123", "ek_new456"));
}

/// **VALUE**: Verifies a missing literal leaves the content identical.
#[test]
fn given_no_literal_when_replaced_then_content_unchanged() {
    let content = "let apiKey = \"double-quoted\";\n";

    let (outcome, updated) = replace_key_literal(content, "apiKey", "NEW").expect("no error");

    assert_eq!(outcome, PatchOutcome::PatternNotFound);
    assert_eq!(updated, content);
}

/// **VALUE**: Verifies only the first occurrence is replaced.
#[test]
fn given_two_literals_when_replaced_then_only_first_changes() {
    let content = "const apiKey = 'A'\nconst apiKey = 'B'\n";

    let (outcome, updated) = replace_key_literal(content, "apiKey", "NEW").expect("no error");

    assert_eq!(outcome, PatchOutcome::Updated);
    assert_eq!(updated, "const apiKey = 'NEW'\nconst apiKey = 'B'\n");
}

/// **VALUE**: Verifies `$` sequences in the key are inserted verbatim.
///
/// **BUG THIS CATCHES**: `Regex::replace` expands `$1`/`$name` in replacement strings.
/// Without `NoExpand` a key containing `$` would be mangled.
#[test]
fn given_key_with_dollar_when_replaced_then_inserted_literally() {
    let (_, updated) =
        replace_key_literal("const apiKey = 'old'", "apiKey", "ek_$1$abc").expect("no error");

    assert_eq!(updated, "const apiKey = 'ek_$1$abc'");
}

/// **VALUE**: Verifies an up-to-date literal is reported as such.
#[test]
fn given_same_key_when_replaced_then_already_current() {
    let (outcome, updated) =
        replace_key_literal("const apiKey = 'SAME'", "apiKey", "SAME").expect("no error");

    assert_eq!(outcome, PatchOutcome::AlreadyCurrent);
    assert_eq!(updated, "const apiKey = 'SAME'");
}

/// **VALUE**: Verifies keys that would break out of the literal are refused.
///
/// **WHY THIS MATTERS**: The key comes from a remote service. A quote in it would
/// turn the patch into arbitrary source injection.
#[test]
fn given_key_with_quote_when_replaced_then_returns_unsafe_key() {
    let result = replace_key_literal("const apiKey = 'old'", "apiKey", "bad'; alert(1); '");

    match result {
        Err(PatchError::UnsafeKey { character, .. }) => assert_eq!(character, '\''),
        other => panic!("Expected UnsafeKey, got {other:?}"),
    }
}

/// **VALUE**: Verifies the identifier is matched literally, not as a regex.
#[test]
fn given_identifier_with_dollar_when_replaced_then_matched_literally() {
    let content = "const $key = 'old'\nconst xkey = 'other'\n";

    let (outcome, updated) = replace_key_literal(content, "$key", "NEW").expect("no error");

    assert_eq!(outcome, PatchOutcome::Updated);
    assert_eq!(updated, "const $key = 'NEW'\nconst xkey = 'other'\n");
}
