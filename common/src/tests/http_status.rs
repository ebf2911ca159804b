// Unit tests for status classification

use crate::HttpStatusCode;

/// **VALUE**: Only a literal 200 counts as success.
///
/// **WHY THIS MATTERS**: The key file must never be written for a response the
/// remote side did not fully accept. A 201/204 has no key body to persist.
#[test]
fn given_status_codes_when_is_ok_then_only_200_matches() {
    assert!(HttpStatusCode(200).is_ok());
    assert!(!HttpStatusCode(201).is_ok());
    assert!(!HttpStatusCode(204).is_ok());
    assert!(!HttpStatusCode(404).is_ok());
}

/// **VALUE**: Client and server ranges are disjoint and bounded.
#[test]
fn given_status_codes_when_classified_then_ranges_are_correct() {
    assert!(HttpStatusCode(401).is_client_error());
    assert!(!HttpStatusCode(401).is_server_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(600).is_server_error());
    assert!(!HttpStatusCode(200).is_client_error());
}
