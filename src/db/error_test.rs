//! Tests for database error types.

use crate::db::DbError;

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::not_found("Project", "0b8f4c1e");
    assert_eq!(
        err.to_string(),
        "Entity not found: Project with id '0b8f4c1e'"
    );
}

#[test]
fn unavailable_error_matches_tool_message() {
    assert_eq!(DbError::Unavailable.to_string(), "Database not connected");
}

#[test]
fn validation_error_displays_correctly() {
    let err = DbError::Validation {
        message: "title cannot be empty".to_string(),
    };
    assert_eq!(err.to_string(), "Validation error: title cannot be empty");
}

#[test]
fn sqlx_errors_become_database_errors() {
    let err: DbError = sqlx::Error::RowNotFound.into();
    assert!(matches!(err, DbError::Database { .. }));
}
