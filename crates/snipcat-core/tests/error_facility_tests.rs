use snipcat_core::errors::{ExError, ExErrorKind, FieldViolation, SnipcatError};
use snipcat_core_types::RequestId;

#[test]
fn test_category_not_found_verifiable_by_kind() {
    let ex_err: ExError = SnipcatError::CategoryNotFound {
        slug: "unknown".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::NotFound);
    assert_eq!(ex_err.code(), "ERR_NOT_FOUND");
    assert_eq!(ex_err.entity_id(), Some("unknown"));
}

#[test]
fn test_unknown_category_id_is_a_field_violation() {
    let ex_err: ExError = SnipcatError::CategoryIdNotFound { category_id: 42 }.into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(
        ex_err.violations(),
        [FieldViolation::new("categoryId", "Category does not exist")]
    );
}

#[test]
fn test_duplicate_distinct_from_invalid_input() {
    let ex_err: ExError = SnipcatError::DuplicateCategory {
        field: "slug".to_string(),
        value: "analytics".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::AlreadyExists);
    assert_ne!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert!(ex_err.message().contains("slug"));
}

#[test]
fn test_preview_errors() {
    let unmounted: ExError = SnipcatError::PreviewUnmounted.into();
    assert_eq!(unmounted.code(), "ERR_PREVIEW_UNMOUNTED");
    assert_eq!(unmounted.op(), Some("render"));

    let unsafe_cap: ExError = SnipcatError::UnsafeSandboxCapability {
        capability: "allow-same-origin".to_string(),
    }
    .into();
    assert_eq!(unsafe_cap.kind(), ExErrorKind::IsolationViolation);
    assert_eq!(unsafe_cap.entity_id(), Some("allow-same-origin"));
}

#[test]
fn test_request_id_carried_in_display() {
    let request_id = RequestId::from_header("req-123");
    let ex_err = ExError::new(ExErrorKind::Persistence)
        .with_op("create_snippet")
        .with_request_id(request_id)
        .with_message("disk full");

    assert_eq!(ex_err.request_id().map(|r| r.as_str()), Some("req-123"));
    assert_eq!(
        ex_err.to_string(),
        "[ERR_PERSISTENCE] in operation 'create_snippet': disk full (request_id: req-123)"
    );
}

#[test]
fn test_source_chain() {
    let inner = ExError::new(ExErrorKind::Io).with_message("permission denied");
    let outer = ExError::new(ExErrorKind::Persistence).with_source(inner);

    assert_eq!(outer.source_error().map(|e| e.kind()), Some(ExErrorKind::Io));
    assert!(std::error::Error::source(&outer).is_some());
}
