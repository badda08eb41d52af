//! JSON-RPC 2.0 envelopes and the reserved error codes this server emits.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const RESOURCE_READ_FAILED: i32 = -32000;

/// Inbound envelope.
///
/// A missing or `null` id marks a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl Request {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outbound envelope carrying exactly one of `result` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProtocolError>,
}

impl Response {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: ProtocolError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Protocol-level error. Always reported to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message} ({code})")]
pub struct ProtocolError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProtocolError {
    fn new(code: i32, message: &str, data: impl Into<Value>) -> Self {
        Self {
            code,
            message: message.to_string(),
            data: Some(data.into()),
        }
    }

    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, "Parse error", detail.to_string())
    }

    /// Valid JSON that is not a request envelope.
    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request", detail.to_string())
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            METHOD_NOT_FOUND,
            "Method not found",
            format!("Unknown method: {method}"),
        )
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, "Unknown tool", format!("Tool not found: {name}"))
    }

    pub fn invalid_params(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_PARAMS, "Invalid params", detail.to_string())
    }

    pub fn unknown_resource(uri: &str) -> Self {
        Self::new(
            INVALID_PARAMS,
            "Unknown resource",
            format!("Resource not found: {uri}"),
        )
    }

    pub fn resource_read_failed(text: String) -> Self {
        Self::new(RESOURCE_READ_FAILED, "Resource read failed", text)
    }
}

/// Result of running a tool. `is_error` flags an in-band failure that is
/// still delivered inside a successful envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    /// Pretty-printed JSON of `value`.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self {
                text,
                is_error: false,
            },
            Err(e) => Self::error(format!("failed to encode result: {e}")),
        }
    }

    /// `{"error": message}` flagged as a failure.
    pub fn error(message: impl Into<String>) -> Self {
        let body = json!({ "error": message.into() });
        Self {
            text: serde_json::to_string_pretty(&body).unwrap_or_default(),
            is_error: true,
        }
    }

    /// The `tools/call` result shape.
    pub fn into_result(self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_omits_absent_id_and_error() {
        let value = serde_json::to_value(Response::success(None, json!({}))).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "result": {}}));
    }

    #[test]
    fn failure_carries_code_and_data() {
        let response = Response::failure(Some(json!(7)), ProtocolError::method_not_found("nope"));
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "error": {"code": -32601, "message": "Method not found", "data": "Unknown method: nope"}
            })
        );
    }

    #[test]
    fn null_id_is_a_notification() {
        let request: Request =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":null,"method":"initialized"}"#).unwrap();
        assert!(request.is_notification());
    }

    #[test]
    fn tool_error_is_json_with_flag() {
        let outcome = ToolOutcome::error("Database not connected");
        assert!(outcome.is_error);
        let body: Value = serde_json::from_str(&outcome.text).unwrap();
        assert_eq!(body, json!({"error": "Database not connected"}));
    }
}
