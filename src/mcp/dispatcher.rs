//! Method table for the JSON-RPC protocol.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::hub::HubHandle;

use super::call::{CallError, ToolCall};
use super::catalog::{self, RESOURCE_MIME_TYPE, RESOURCES, TOOLS};
use super::protocol::{ProtocolError, Request, Response, ToolOutcome};
use super::tools::Tools;

pub const SERVER_NAME: &str = "agent-shaker";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol revisions this server speaks, newest first.
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2025-03-26", "2024-11-05"];
/// Offered when the client asks for something we do not speak.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// Echo the client's revision when supported, otherwise fall back.
pub fn negotiate_version(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| SUPPORTED_PROTOCOL_VERSIONS.iter().find(|s| **s == v))
        .copied()
        .unwrap_or(DEFAULT_PROTOCOL_VERSION)
}

fn capabilities() -> Value {
    json!({
        "tools": { "listChanged": false },
        "resources": { "subscribe": false, "listChanged": false },
    })
}

/// Payload for a plain discovery GET.
pub fn server_info() -> Value {
    json!({
        "name": SERVER_NAME,
        "version": SERVER_VERSION,
        "protocolVersion": DEFAULT_PROTOCOL_VERSION,
        "capabilities": capabilities(),
    })
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    protocol_version: Option<String>,
    client_info: Option<Value>,
}

#[derive(Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

#[derive(Deserialize)]
struct ReadParams {
    uri: String,
}

fn required_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T, ProtocolError> {
    let params = params.ok_or_else(|| ProtocolError::invalid_params("missing params"))?;
    serde_json::from_value(params).map_err(ProtocolError::invalid_params)
}

fn is_initialized_ack(method: &str) -> bool {
    matches!(method, "initialized" | "notifications/initialized")
}

/// Routes protocol requests to the catalog and tools.
pub struct Dispatcher<D: Database> {
    tools: Tools<D>,
}

impl<D: Database + 'static> Dispatcher<D> {
    pub fn new(db: Option<Arc<D>>, hub: HubHandle) -> Self {
        Self {
            tools: Tools::new(db, hub),
        }
    }

    /// Decode and handle one raw envelope. `None` means nothing should be
    /// sent back.
    ///
    /// Bytes that are not JSON get a parse error without an id. JSON that
    /// is not a request envelope gets an invalid-request error that still
    /// echoes whatever id it carried.
    pub async fn handle_raw(&self, body: &[u8]) -> Option<Response> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "unparseable protocol request");
                return Some(Response::failure(None, ProtocolError::parse_error(e)));
            }
        };

        let id = value.get("id").filter(|id| !id.is_null()).cloned();
        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, id = ?id, "malformed protocol envelope");
                Some(Response::failure(id, ProtocolError::invalid_request(e)))
            }
        }
    }

    pub async fn handle(&self, request: Request) -> Option<Response> {
        info!(method = %request.method, id = ?request.id, "protocol request");

        if request.is_notification() && is_initialized_ack(&request.method) {
            return None;
        }

        let id = request.id;
        Some(match self.call(&request.method, request.params).await {
            Ok(result) => Response::success(id, result),
            Err(error) => Response::failure(id, error),
        })
    }

    async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, ProtocolError> {
        match method {
            "initialize" => Ok(self.initialize(params)),
            m if is_initialized_ack(m) => Ok(json!({})),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": TOOLS })),
            "tools/call" => self.call_tool(required_params(params)?).await,
            "resources/list" => Ok(json!({ "resources": RESOURCES })),
            "resources/read" => self.read_resource(required_params(params)?).await,
            other => Err(ProtocolError::method_not_found(other)),
        }
    }

    fn initialize(&self, params: Option<Value>) -> Value {
        // Unreadable initialize params are tolerated; negotiation falls back.
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        let version = negotiate_version(params.protocol_version.as_deref());
        info!(
            client = ?params.client_info,
            requested = ?params.protocol_version,
            negotiated = version,
            "protocol initialize"
        );

        json!({
            "protocolVersion": version,
            "capabilities": capabilities(),
            "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        })
    }

    async fn call_tool(&self, params: CallParams) -> Result<Value, ProtocolError> {
        debug!(tool = %params.name, "tool call received");
        let outcome = match ToolCall::parse(&params.name, params.arguments.as_ref()) {
            Ok(call) => self.tools.execute(call).await,
            Err(CallError::UnknownTool(name)) => return Err(ProtocolError::unknown_tool(&name)),
            Err(e @ CallError::InvalidArguments(_)) => {
                debug!(tool = %params.name, error = %e, "rejected tool arguments");
                ToolOutcome::error(e.to_string())
            }
        };
        Ok(outcome.into_result())
    }

    async fn read_resource(&self, params: ReadParams) -> Result<Value, ProtocolError> {
        let resource = catalog::find_resource(&params.uri)
            .ok_or_else(|| ProtocolError::unknown_resource(&params.uri))?;

        let outcome = self.tools.read(resource.kind).await;
        if outcome.is_error {
            return Err(ProtocolError::resource_read_failed(outcome.text));
        }

        Ok(json!({
            "contents": [{
                "uri": resource.uri,
                "mimeType": RESOURCE_MIME_TYPE,
                "text": outcome.text,
            }]
        }))
    }
}
