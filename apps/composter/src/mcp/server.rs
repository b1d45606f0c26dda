use anyhow::Result;
use serde_json::{Value, json};
use tokio::io::{self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::mcp::protocol::{
    DEFAULT_PROTOCOL_VERSION, JSONRPC_VERSION, JsonRpcRequest, JsonRpcResponse, JsonRpcResult,
    invalid_params, invalid_request, method_not_found, parse_error,
};
use crate::mcp::registry;
use crate::mcp::tools::VaultTools;

pub const SERVER_NAME: &str = "Composter";

/// Serves the vault tools over newline-delimited JSON-RPC.
///
/// Messages are handled strictly in arrival order: each one completes
/// before the next line is read.
pub struct McpServer {
    tools: VaultTools,
}

impl McpServer {
    pub fn new(tools: VaultTools) -> Self {
        Self { tools }
    }

    pub async fn run_stdio(&self) -> Result<()> {
        info!(target: "composter::mcp", "Composter MCP server running on stdio");
        self.serve(io::stdin(), io::stdout()).await?;
        info!(target: "composter::mcp", "stdin closed; shutting down");
        Ok(())
    }

    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                return Ok(());
            }
            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    debug!(target: "composter::mcp", received = %trimmed);
                    self.handle_line(trimmed).await
                }
                Err(err) => {
                    warn!(target: "composter::mcp", error = %err, "discarding non utf-8 line");
                    Some(parse_error("invalid utf-8"))
                }
            };
            if let Some(response) = response {
                write_message(&mut writer, &response).await?;
            }
        }
    }

    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value = match serde_json::from_str::<Value>(line) {
            Ok(value) => value,
            Err(err) => {
                warn!(target: "composter::mcp", error = %err, "failed to parse JSON payload");
                return Some(parse_error("invalid json"));
            }
        };
        let raw_id = value.get("id").cloned();
        let request = match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => request,
            Err(err) => {
                warn!(target: "composter::mcp", error = %err, "invalid JSON-RPC request");
                return Some(invalid_request(raw_id, "invalid request"));
            }
        };
        if request.jsonrpc != JSONRPC_VERSION {
            return request
                .id
                .map(|id| invalid_request(Some(id), "jsonrpc version must be 2.0"));
        }
        self.handle_request(request).await
    }

    /// `None` for notifications, which never get a reply.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;
        let Some(id) = id else {
            debug!(target: "composter::mcp", %method, "notification");
            return None;
        };
        let params = params.unwrap_or_else(|| json!({}));

        match method.as_str() {
            "initialize" => Some(result(id, self.initialize(&params))),
            "ping" => Some(result(id, json!({}))),
            "tools/list" => Some(result(id, json!({"tools": registry::descriptors()}))),
            "tools/call" => Some(self.tools_call(id, &params).await),
            _ => Some(method_not_found(Some(id), &method)),
        }
    }

    fn initialize(&self, params: &Value) -> Value {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(|value| value.as_str())
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);
        info!(target: "composter::mcp", protocol_version, "client initialized session");
        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": {"listChanged": false}
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    async fn tools_call(&self, id: Value, params: &Value) -> JsonRpcResponse {
        let Some(name) = params.get("name").and_then(|value| value.as_str()) else {
            return invalid_params(Some(id), "tool name missing");
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        match self.tools.invoke(name, &arguments).await {
            Ok(output) => result(id, output.into_value()),
            Err(message) => invalid_params(Some(id), message),
        }
    }
}

fn result(id: Value, value: Value) -> JsonRpcResponse {
    JsonRpcResponse::Result(JsonRpcResult::new(id, value))
}

async fn write_message<W>(writer: &mut W, response: &JsonRpcResponse) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut text = serde_json::to_string(response).map_err(io::Error::other)?;
    text.push('\n');
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await
}
