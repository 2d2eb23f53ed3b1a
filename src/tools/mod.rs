//! The fixed catalogue of tools exposed to MCP hosts.
//!
//! Each entry pairs a name, a description and an input schema with a handler
//! that validates arguments, calls [`TldvClient`] and renders the response
//! envelope as JSON text. Success and error envelopes are rendered the same
//! way; only malformed arguments fail the call itself.

pub mod args;

use crate::api::{ApiResponse, TldvClient};
use crate::error::Result;
use futures::future::BoxFuture;
use rmcp::model::{JsonObject, Tool};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

type ToolHandler = for<'a> fn(&'a TldvClient, JsonObject) -> BoxFuture<'a, Result<String>>;

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    schema: fn() -> Value,
    handler: ToolHandler,
}

pub static TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "get-meeting-metadata",
        description: "Get metadata for a tl;dv meeting by ID: name, date, URL, organizer, \
                      invitees and template.",
        schema: meeting_metadata_schema,
        handler: get_meeting_metadata,
    },
    ToolSpec {
        name: "get-transcript",
        description: "Get the transcript of a tl;dv meeting as an ordered list of sentences \
                      with speaker and start/end times.",
        schema: meeting_id_schema,
        handler: get_transcript,
    },
    ToolSpec {
        name: "list-meetings",
        description: "List tl;dv meetings, optionally filtered by search query, date range, \
                      participation and meeting type. Results are paginated.",
        schema: list_meetings_schema,
        handler: list_meetings,
    },
    ToolSpec {
        name: "get-highlights",
        description: "Get the highlights of a tl;dv meeting, each with its text, start time, \
                      source (manual or auto) and topic.",
        schema: meeting_id_schema,
        handler: get_highlights,
    },
];

pub fn find_tool(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

impl ToolSpec {
    pub fn input_schema(&self) -> JsonObject {
        match (self.schema)() {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        }
    }

    pub fn to_mcp_tool(&self) -> Tool {
        Tool::new(self.name, self.description, Arc::new(self.input_schema()))
    }

    /// Validate `args`, call the API and return the serialized envelope
    pub async fn invoke(&self, client: &TldvClient, args: JsonObject) -> Result<String> {
        debug!("Invoking tool '{}'", self.name);
        (self.handler)(client, args).await
    }
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

fn get_meeting_metadata(client: &TldvClient, args: JsonObject) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let id = args::required_string(&args, "id")?;
        render(&client.get_meeting(&id).await)
    })
}

fn get_transcript(client: &TldvClient, args: JsonObject) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let meeting_id = args::required_string(&args, "meetingId")?;
        render(&client.get_transcript(&meeting_id).await)
    })
}

fn list_meetings(client: &TldvClient, args: JsonObject) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let params = args::meetings_params(&args)?;
        render(&client.get_meetings(&params).await)
    })
}

fn get_highlights(client: &TldvClient, args: JsonObject) -> BoxFuture<'_, Result<String>> {
    Box::pin(async move {
        let meeting_id = args::required_string(&args, "meetingId")?;
        render(&client.get_highlights(&meeting_id).await)
    })
}

fn meeting_metadata_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": {
                "type": "string",
                "description": "The meeting ID"
            }
        },
        "required": ["id"]
    })
}

fn meeting_id_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "meetingId": {
                "type": "string",
                "description": "The meeting ID"
            }
        },
        "required": ["meetingId"]
    })
}

fn list_meetings_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Search text matched against meeting names"
            },
            "page": {
                "type": "integer",
                "minimum": 1,
                "description": "Page number"
            },
            "limit": {
                "type": "integer",
                "minimum": 1,
                "default": 50,
                "description": "Meetings per page"
            },
            "from": {
                "type": "string",
                "format": "date-time",
                "description": "Only meetings on or after this ISO-8601 date-time"
            },
            "to": {
                "type": "string",
                "format": "date-time",
                "description": "Only meetings on or before this ISO-8601 date-time"
            },
            "onlyParticipated": {
                "type": "boolean",
                "description": "Only meetings the API key owner took part in"
            },
            "meetingType": {
                "type": "string",
                "enum": ["internal", "external"],
                "description": "Filter by meeting type"
            }
        }
    })
}
