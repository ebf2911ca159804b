// Unit tests for the binary's error type

use crate::error::AppError;

use std::io::{Error as IoError, ErrorKind};

/// **VALUE**: Verifies io errors become console errors with a location.
///
/// **BUG THIS CATCHES**: Would catch dropping `#[track_caller]` on the `From` impl,
/// which would point every console error at error.rs instead of the write site.
#[test]
fn given_io_error_when_converted_then_console_error_with_location() {
    // GIVEN: A broken pipe
    let io = IoError::new(ErrorKind::BrokenPipe, "stdout closed");

    // WHEN: Converting
    let err = AppError::from(io);

    // THEN: Console variant naming this file
    let message = err.to_string();
    assert!(matches!(err, AppError::Console { .. }));
    assert!(message.contains("stdout closed"));
    assert!(message.contains("tests"), "location should point at the caller: {message}");
}
