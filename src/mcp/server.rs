/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads newline-delimited JSON-RPC requests
/// 2. Routes tool calls to the habit tools with the current reference date
/// 3. Writes one JSON-RPC response line per request (none for notifications)

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{ServerError, TrackifyServer};

/// MCP server that handles communication with the client
pub struct McpServer {
    tracker: TrackifyServer,
    /// Whether the client has completed the initialize handshake
    initialized: bool,
}

/// Why a tool call could not produce a result
enum CallFailure {
    InvalidArguments(String),
    Internal(String),
}

impl McpServer {
    pub fn new(tracker: TrackifyServer) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Serve requests from `reader` until it is exhausted
    pub async fn serve<R, W>(&mut self, reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server waiting for JSON-RPC requests...");
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if let Some(response) = self.process_line(&line) {
                let response_str = serde_json::to_string(&response)?;
                writer.write_all(response_str.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
                debug!("Sent response: {}", response_str);
            }
        }

        info!("MCP server shutting down (input closed)");
        Ok(())
    }

    /// Process a single line of JSON-RPC input
    fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request)
    }

    /// Handle a JSON-RPC request, returning `None` for notifications
    fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            match request.method.as_str() {
                "notifications/initialized" | "initialized" => {
                    self.initialized = true;
                    debug!("Client finished initialization");
                }
                other => debug!("Ignoring notification '{}'", other),
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };
        Some(response)
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(init)) => {
                let client = init
                    .client_info
                    .map(|c| format!("{} {}", c.name, c.version))
                    .unwrap_or_else(|| "unknown client".to_string());
                info!("MCP client connected: {} (protocol {})", client.trim(), init.protocol_version);
            }
            Some(Err(e)) => warn!("Unreadable initialize params: {}", e),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Trackify Habits".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        if !self.initialized {
            warn!("Tool '{}' called before initialization completed", tool_params.name);
        }

        match self.call_tool(&tool_params.name, tool_params.arguments) {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
            },
            Err(CallFailure::InvalidArguments(message)) => {
                JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message, None)
            }
            Err(CallFailure::Internal(message)) => {
                JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, message, None)
            }
        }
    }

    /// Route a tool call by name
    fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<ToolCallResult, CallFailure> {
        let storage = self.tracker.storage();
        let today = self.tracker.reference_date();
        debug!("Calling tool '{}' with reference date {}", name, today);

        match name {
            "habit_create" => run_tool(
                args,
                |p| tools::create_habit(storage, p, today),
                |r: &tools::CreateHabitResponse| format!("{}\nHabit ID: {}", r.message, r.habit_id),
            ),
            "habit_update" => run_tool(
                args,
                |p| tools::update_habit(storage, p, today),
                |r: &tools::UpdateHabitResponse| r.message.clone(),
            ),
            "habit_toggle" => run_tool(
                args,
                |p| tools::toggle_habit(storage, p, today),
                |r: &tools::ToggleHabitResponse| r.message.clone(),
            ),
            "habit_delete" => run_tool(
                args,
                |p| tools::delete_habit(storage, p),
                |r: &tools::DeleteHabitResponse| r.message.clone(),
            ),
            "habit_list" => run_tool(
                args,
                |p| tools::list_habits(storage, p, today),
                format_habit_list,
            ),
            "habit_status" => run_tool(
                args,
                |p| tools::get_habit_status(storage, p, today),
                |r: &tools::StatusResponse| r.message.clone(),
            ),
            "habit_calendar" => run_tool(
                args,
                |p| tools::habit_calendar(storage, p, today),
                |r: &tools::CalendarResponse| r.message.clone(),
            ),
            _ => Ok(ToolCallResult::error(format!("Unknown tool: {}", name))),
        }
    }
}

/// Deserialize arguments, run a tool and wrap its response
///
/// Tool failures become `isError` results; only arguments that do not fit
/// the tool's parameter type are reported as protocol errors.
fn run_tool<P, R>(
    args: Map<String, Value>,
    tool: impl FnOnce(P) -> Result<R, ToolError>,
    render: impl FnOnce(&R) -> String,
) -> Result<ToolCallResult, CallFailure>
where
    P: DeserializeOwned,
    R: Serialize,
{
    let params: P = serde_json::from_value(Value::Object(args))
        .map_err(|e| CallFailure::InvalidArguments(format!("Invalid arguments: {}", e)))?;

    match tool(params) {
        Ok(response) => {
            let structured =
                serde_json::to_value(&response).map_err(|e| CallFailure::Internal(e.to_string()))?;
            Ok(ToolCallResult::success(render(&response), structured))
        }
        Err(e) => {
            warn!("Tool call failed: {}", e);
            Ok(ToolCallResult::error(e.to_string()))
        }
    }
}

fn format_habit_list(response: &tools::ListHabitsResponse) -> String {
    if response.habits.is_empty() {
        return "No habits found. Create your first habit to get started!".to_string();
    }

    let summary = format!(
        "📋 Habit Summary ({} habits)\nToday: {} of {} scheduled done ({}%)\n\n",
        response.habits.len(),
        response.today.completed_count,
        response.today.scheduled_count,
        response.today.progress_percent
    );

    let detailed_list = response
        .habits
        .iter()
        .map(|h| {
            format!(
                "{} {} ({})\n   📅 {} | 🔥 Streak: {} days | 🏆 Best: {} days | 📊 Rate: {:.1}%\n   ID: {}",
                if h.completed_today { "✅" } else if h.scheduled_today { "⏳" } else { "💤" },
                h.name,
                h.category,
                h.frequency,
                h.current_streak,
                h.longest_streak,
                h.completion_rate * 100.0,
                h.habit_id
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}{}", summary, detailed_list)
}

/// Input schema generated from a tool's parameter type
fn schema<T: schemars::JsonSchema>() -> Value {
    let root = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
    serde_json::to_value(root).unwrap_or_else(|_| json!({ "type": "object" }))
}

/// The tools this server provides
pub fn tool_definitions() -> Vec<ToolDefinition> {
    let tool = |name: &str, description: &str, input_schema: Value| ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    };

    vec![
        tool(
            "habit_create",
            "Create a new habit with a weekly schedule",
            schema::<tools::CreateHabitParams>(),
        ),
        tool(
            "habit_update",
            "Change a habit's name, description, category, schedule or reminder",
            schema::<tools::UpdateHabitParams>(),
        ),
        tool(
            "habit_toggle",
            "Mark a habit done or undone for today or a past date",
            schema::<tools::ToggleHabitParams>(),
        ),
        tool(
            "habit_delete",
            "Delete a habit and its completion history",
            schema::<tools::DeleteHabitParams>(),
        ),
        tool(
            "habit_list",
            "List habits with streaks, completion rates and today's progress",
            schema::<tools::ListHabitsParams>(),
        ),
        tool(
            "habit_status",
            "Check streaks and today's status for one habit or all of them",
            schema::<tools::StatusParams>(),
        ),
        tool(
            "habit_calendar",
            "Show a month calendar of full, partial and missed days",
            schema::<tools::CalendarParams>(),
        ),
    ]
}
