//! Integration tests for Error types
//!
//! Tests error construction, display, and aggregation.

use schemata_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn unresolved_type_names_the_referrer() {
    let err = Error::unresolved_type("shop.Missing", "shop.Order#item");
    assert!(matches!(err.kind, ErrorKind::UnresolvedType { .. }));
    assert_eq!(err.to_string(), "unable to resolve shop.Missing (referenced from shop.Order#item)");
}

#[test]
fn unexpected_value_type_has_fixed_prefix() {
    let err = Error::unexpected_value_type("google.protobuf.FieldOptions#deprecated", "bool");
    assert!(err.to_string().starts_with("unexpected field value type"));
}

#[test]
fn package_cycles_list_members() {
    let err = Error::new(ErrorKind::PackageCycle(vec![vec!["a".into(), "b".into()]]));
    let msg = err.to_string();
    assert!(msg.contains("a -> b"));
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn aggregate_collects_every_message() {
    let err = Error::aggregate("move", vec!["first".into(), "second".into()]).unwrap_err();
    assert_eq!(err.messages(), vec!["first".to_string(), "second".to_string()]);
    assert_eq!(err.to_string(), "move failed:\n  first\n  second");
}

#[test]
fn context_is_attached() {
    let err = Error::invalid_name("a..b", "empty path segment")
        .with_context(ErrorContext::new().with_file("a.proto").with_frame("a.B"));
    let context = err.context.unwrap();
    assert_eq!(context.file.as_deref(), Some("a.proto"));
    assert_eq!(context.stack, vec!["a.B".to_string()]);
}
