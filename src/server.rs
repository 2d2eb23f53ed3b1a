// MCP server exposing the tl;dv tool catalogue over stdio.
// Tool matching and argument checks happen here; the API client does the rest.

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::TldvClient;
use crate::error::{Result, TldvError};
use crate::tools::{find_tool, TOOLS};

#[derive(Clone)]
pub struct TldvServer {
    client: Arc<TldvClient>,
}

impl TldvServer {
    pub fn new(client: TldvClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Catalogue rendered as MCP tool descriptors
    pub fn tools(&self) -> Vec<Tool> {
        TOOLS.iter().map(|tool| tool.to_mcp_tool()).collect()
    }

    /// Run one tool call. The serialized envelope is the only content item,
    /// whether the API call succeeded or not.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let tool = find_tool(name).ok_or_else(|| {
            warn!("Unknown tool requested: {}", name);
            McpError::invalid_params(format!("Unknown tool: {}", name), None)
        })?;

        let text = tool
            .invoke(&self.client, arguments.unwrap_or_default())
            .await
            .map_err(|e| {
                warn!("Tool '{}' rejected: {}", name, e);
                e.into_mcp_error()
            })?;

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

impl ServerHandler for TldvServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Read-only access to tl;dv meetings: metadata, transcripts, highlights and \
                 meeting search. Every tool returns a JSON object with either `data` or `error`."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        debug!("Listing {} tools", TOOLS.len());
        Ok(ListToolsResult {
            meta: None,
            tools: self.tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        debug!("Calling tool: {}", params.name);
        self.dispatch(&params.name, params.arguments).await
    }
}

/// Serve over stdin/stdout until the host disconnects or `ct` is cancelled
pub async fn serve_stdio(server: TldvServer, ct: CancellationToken) -> Result<()> {
    let service = server
        .serve_with_ct(rmcp::transport::stdio(), ct)
        .await
        .map_err(|e| TldvError::Protocol(format!("MCP handshake failed: {}", e)))?;

    info!("MCP server connected over stdio");

    let reason = service
        .waiting()
        .await
        .map_err(|e| TldvError::Protocol(format!("MCP service task failed: {}", e)))?;

    info!("MCP server stopped: {:?}", reason);
    Ok(())
}
