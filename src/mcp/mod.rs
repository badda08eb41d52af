//! Agent-facing protocol: JSON-RPC 2.0 over HTTP with an optional
//! event-stream session.
//!
//! # Architecture
//!
//! - **protocol**: envelopes, reserved error codes, in-band tool outcomes
//! - **catalog**: static tool and resource descriptors
//! - **call**: typed tool invocations parsed from untyped arguments
//! - **tools**: one struct per tracker collection, generic over `D: Database`
//! - **dispatcher**: the method table
//! - **session**: live event-stream sessions
//! - **transport**: axum handlers and CORS
//!
//! Tool failures never become protocol errors. Callers get a two-tier
//! result: a [`ProtocolError`] for routing problems, otherwise a
//! [`ToolOutcome`] whose `is_error` flag marks in-band failure.

pub mod call;
pub mod catalog;
mod dispatcher;
pub mod protocol;
mod session;
pub mod tools;
mod transport;

#[cfg(test)]
mod dispatcher_test;

pub use dispatcher::{
    DEFAULT_PROTOCOL_VERSION, Dispatcher, SERVER_NAME, SERVER_VERSION,
    SUPPORTED_PROTOCOL_VERSIONS, negotiate_version, server_info,
};
pub use protocol::{ProtocolError, Request, Response, ToolOutcome};
pub use session::{Session, SessionGuard, SessionStore};
pub use transport::{MESSAGE_PATH, McpState, cors, router};
