//! Database utility functions.

use chrono::{SecondsFormat, Utc};

/// Generate a UUID v4 identifier for database entities.
pub fn generate_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current UTC time as RFC 3339 with microseconds.
///
/// The fixed width keeps lexical order equal to chronological order,
/// which the `ORDER BY created_at` clauses rely on.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
