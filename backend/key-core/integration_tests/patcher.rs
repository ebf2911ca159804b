use key_core::error::PatchError;
use key_core::patcher::patch_file;
use key_core::{PatchOutcome, PatchTarget};

use std::fs;

use tempfile::tempdir;

/// **VALUE**: Verifies the file is rewritten with only the literal changed.
#[test]
fn given_file_with_literal_when_patched_then_only_literal_changes() {
    // GIVEN: A source file with the literal between other code
    let dir = tempdir().unwrap();
    let path = dir.path().join("realtime.ts");
    let original = "const url = 'wss://x';\n        const apiKey = 'OLD'; // expired\nexport {};\n";
    fs::write(&path, original).unwrap();

    // WHEN: Patching
    let outcome = patch_file(&PatchTarget::new(&path, "apiKey"), "NEW").unwrap();

    // THEN: Exactly one substitution
    assert_eq!(outcome, PatchOutcome::Updated);
    assert_eq!(fs::read_to_string(&path).unwrap(), original.replace("'OLD'", "'NEW'"));
}

/// **VALUE**: Verifies a file without the literal is left byte-for-byte identical.
///
/// **WHY THIS MATTERS**: A rewrite of an unchanged file still bumps mtime and can
/// normalise line endings, which shows up as a spurious diff.
#[test]
fn given_file_without_literal_when_patched_then_bytes_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("realtime.ts");
    let original = b"const token = 'OLD'\r\nlet apiKey = 'x'\r\n";
    fs::write(&path, original).unwrap();

    let outcome = patch_file(&PatchTarget::new(&path, "apiKey"), "NEW").unwrap();

    assert_eq!(outcome, PatchOutcome::PatternNotFound);
    assert_eq!(fs::read(&path).unwrap(), original);
}

/// **VALUE**: Verifies a missing file yields a read error carrying the path.
#[test]
fn given_missing_file_when_patched_then_returns_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.ts");

    let result = patch_file(&PatchTarget::new(&path, "apiKey"), "NEW");

    match result {
        Err(PatchError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected Read error, got {other:?}"),
    }
}

/// **VALUE**: Verifies an unsafe key is refused before the file is touched.
#[test]
fn given_unsafe_key_when_patched_then_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("realtime.ts");
    fs::write(&path, "const apiKey = 'OLD'\n").unwrap();

    let result = patch_file(&PatchTarget::new(&path, "apiKey"), "line\nbreak");

    assert!(matches!(result, Err(PatchError::UnsafeKey { character: '\n', .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), "const apiKey = 'OLD'\n");
}

/// **VALUE**: Verifies a missing target is reported as a read failure even for an unsafe key.
///
/// **WHY THIS MATTERS**: The key is checked where the literal is rewritten, after
/// the file has been read. A missing file is the problem the operator must fix first.
#[test]
fn given_missing_file_and_unsafe_key_when_patched_then_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.ts");

    let result = patch_file(&PatchTarget::new(&path, "apiKey"), "it's");

    assert!(matches!(result, Err(PatchError::Read { .. })), "got {result:?}");
    assert!(!path.exists());
}
