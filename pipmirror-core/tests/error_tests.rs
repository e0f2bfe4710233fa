//! Integration tests for error handling

use pipmirror_core::error::{MirrorError, ResultExt};
use pipmirror_core::types::Handle;

#[test]
fn test_error_context_chaining() {
    let err = MirrorError::capture("not authorized").with_context("Listing displays");

    let msg = err.to_string();
    assert!(msg.contains("Listing displays"));
    assert!(msg.contains("not authorized"));
}

#[test]
fn test_result_ext_context() {
    let result: Result<(), MirrorError> = Err(MirrorError::stream_start("window closed"));
    let err = result.context("Selecting Window(4)").unwrap_err();
    assert!(err.to_string().starts_with("Selecting Window(4)"));
}

#[test]
fn test_hint_preserved_through_context() {
    let err = MirrorError::capture("denied");
    let before = err.user_hint();
    let after = err.with_context("Refreshing").user_hint();
    assert_eq!(before, after);
    assert!(after.unwrap_or_default().contains("screen recording"));
}

#[test]
fn test_only_registration_failure_is_fatal() {
    assert!(MirrorError::ConsumerRegistrationFailed("bgra".into()).is_fatal());
    assert!(!MirrorError::InvalidSelection("separator".into()).is_fatal());
    assert!(!MirrorError::StartTimeout {
        handle: Handle::new(),
        timeout_ms: 5000
    }
    .is_fatal());
}

#[test]
fn test_start_timeout_message() {
    let handle = Handle::new();
    let err = MirrorError::StartTimeout {
        handle,
        timeout_ms: 250,
    };
    assert_eq!(
        err.to_string(),
        format!("{} produced no frames within 250ms", handle)
    );
}
