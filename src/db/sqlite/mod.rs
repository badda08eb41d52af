//! SQLite implementation of the database traits.
//!
//! This module provides a SQLx-backed implementation of the repository
//! traits defined in the parent module.

mod agent;
mod connection;
mod context;
mod dashboard;
mod project;
mod task;

#[cfg(test)]
mod connection_test;
#[cfg(test)]
mod dashboard_test;

pub use agent::SqliteAgentRepository;
pub use connection::SqliteDatabase;
pub use context::SqliteContextRepository;
pub use project::SqliteProjectRepository;
pub use task::SqliteTaskRepository;
