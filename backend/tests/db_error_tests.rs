//! Tests for db::repository::error.

use fahrplan_meta::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("insert_meta")
        .with_entity("meta")
        .with_entity_id(1)
        .with_details("disk full")
        .retryable();

    assert_eq!(ctx.operation.as_deref(), Some("insert_meta"));
    assert_eq!(ctx.entity.as_deref(), Some("meta"));
    assert_eq!(ctx.entity_id.as_deref(), Some("1"));
    assert_eq!(ctx.details.as_deref(), Some("disk full"));
    assert!(ctx.retryable);
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("query_meta").with_entity("metas");
    let display = ctx.to_string();
    assert!(display.contains("operation=query_meta"));
    assert!(display.contains("entity=metas"));
    assert!(!display.contains("retryable"));
}

#[test]
fn test_error_context_default_is_empty() {
    let ctx = ErrorContext::default();
    assert!(ctx.operation.is_none());
    assert!(!ctx.retryable);
    assert_eq!(ctx.to_string(), "[]");
}

#[test]
fn test_storage_error_message() {
    let err = RepositoryError::storage_with_context(
        "write failed",
        ErrorContext::new("insert_meta").retryable(),
    );
    let text = err.to_string();
    assert!(text.contains("Storage error"));
    assert!(text.contains("write failed"));
    assert!(text.contains("operation=insert_meta"));
    assert!(err.is_storage());
    assert!(err.is_retryable());
}

#[test]
fn test_plain_storage_error_is_not_retryable() {
    assert!(!RepositoryError::storage("constraint violated").is_retryable());
}

#[test]
fn test_only_storage_errors_are_retryable() {
    let context = ErrorContext::new("query_meta").retryable();
    assert!(!RepositoryError::not_found_with_context("no row", context.clone()).is_retryable());
    assert!(!RepositoryError::internal_with_context("boom", context.clone()).is_retryable());
    assert!(RepositoryError::storage_with_context("busy", context).is_retryable());
    assert!(!RepositoryError::configuration("bad type").is_retryable());
}

#[test]
fn test_with_operation_overrides_context() {
    let err = RepositoryError::not_found("no row").with_operation("refresh_meta");
    assert_eq!(err.context().operation.as_deref(), Some("refresh_meta"));
}

#[tokio::test]
async fn test_join_error_becomes_internal_error() {
    let handle = tokio::spawn(async {
        panic!("database task failed");
    });
    let err: RepositoryError = handle.await.unwrap_err().into();

    assert!(matches!(err, RepositoryError::InternalError { .. }));
    assert_eq!(err.context().details.as_deref(), Some("panicked"));
}

#[test]
fn test_repository_result_propagates_with_question_mark() {
    fn inner() -> RepositoryResult<i32> {
        Err(RepositoryError::storage("nope"))
    }
    fn outer() -> RepositoryResult<i32> {
        let value = inner()?;
        Ok(value + 1)
    }

    assert!(outer().unwrap_err().is_storage());
}
