//! Tool abstraction shared by the MCP bridge, the HTTP server, and the CLI.
//!
//! Each query operation is a [`Tool`]: a name, a description agents use for
//! discovery, a JSON Schema for its parameters, and an async `execute`.
//! [`ToolRegistry::with_builtins`] registers the five GTFOBins tools.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                ToolRegistry                  │
//! │  list_binaries   list_binaries_by_function   │
//! │  list_functions  query_binary  query_function│
//! └──────────────┬───────────────────────────────┘
//!                ▼
//!     McpBridge (stdio / HTTP)  ·  POST /tools/{name}  ·  gtfo tool call
//! ```
//!
//! # Result shape
//!
//! A tool returns the operation's payload on success. Lookup and load
//! failures are *not* `Err`: they come back as `{"Error": "..."}` so callers
//! of the original tool protocol keep working. `Err` is reserved for
//! invalid parameters.

use anyhow::{bail, Result};
use async_trait::async_trait;
use gtfobins_core::error::{into_wire, Operation};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::Config;
use crate::query::QueryService;

/// A tool that agents can discover and call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Lowercase identifier with underscores, e.g. `"query_binary"`.
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// JSON Schema (`type: "object"`) describing the parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with validated parameters.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Per-invocation context handed to tools.
///
/// Holds only configuration; artifacts are loaded inside each call.
pub struct ToolContext {
    config: Arc<Config>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// A query service bound to the configured artifact paths.
    pub fn query(&self) -> QueryService {
        QueryService::from_config(&self.config)
    }
}

/// Serializable tool info for `GET /tools/list` and `gtfo tool list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    /// JSON Schema of the parameters.
    pub parameters: Value,
}

impl ToolInfo {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters_schema(),
        }
    }
}

fn no_params() -> Value {
    json!({
        "type": "object",
        "properties": {}
    })
}

fn single_string_param(name: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            name: { "type": "string", "description": description }
        },
        "required": [name]
    })
}

fn string_param<'a>(params: &'a Value, name: &str) -> &'a str {
    params[name].as_str().unwrap_or("")
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in tools
// ═══════════════════════════════════════════════════════════════════════

pub struct ListBinariesTool;

#[async_trait]
impl Tool for ListBinariesTool {
    fn name(&self) -> &str {
        "list_binaries"
    }

    fn description(&self) -> &str {
        "Return a list of all unix binaries found within GTFOBins."
    }

    fn parameters_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(into_wire(Operation::ListBinaries, ctx.query().list_binaries()))
    }
}

pub struct ListBinariesByFunctionTool;

#[async_trait]
impl Tool for ListBinariesByFunctionTool {
    fn name(&self) -> &str {
        "list_binaries_by_function"
    }

    fn description(&self) -> &str {
        "List all binaries that have a specific function. For example, list all binaries with 'suid' functionality."
    }

    fn parameters_schema(&self) -> Value {
        single_string_param(
            "function_name",
            "The function name to filter binaries by, for example: 'suid', 'file-read'.",
        )
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let function_name = string_param(&params, "function_name");
        Ok(into_wire(
            Operation::ListBinariesByFunction,
            ctx.query().list_binaries_by_function(function_name),
        ))
    }
}

pub struct ListFunctionsTool;

#[async_trait]
impl Tool for ListFunctionsTool {
    fn name(&self) -> &str {
        "list_functions"
    }

    fn description(&self) -> &str {
        "Return a list of all functions and their descriptions from GTFOBins."
    }

    fn parameters_schema(&self) -> Value {
        no_params()
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(into_wire(Operation::ListFunctions, ctx.query().list_functions()))
    }
}

pub struct QueryBinaryTool;

#[async_trait]
impl Tool for QueryBinaryTool {
    fn name(&self) -> &str {
        "query_binary"
    }

    fn description(&self) -> &str {
        "Fetch all the details of a specific unix binary from GTFOBins by name."
    }

    fn parameters_schema(&self) -> Value {
        single_string_param(
            "binary_name",
            "The name of the binary to query, for example: 'base64' or 'find'.",
        )
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let binary_name = string_param(&params, "binary_name");
        Ok(into_wire(Operation::QueryBinary, ctx.query().query_binary(binary_name)))
    }
}

pub struct QueryFunctionTool;

#[async_trait]
impl Tool for QueryFunctionTool {
    fn name(&self) -> &str {
        "query_function"
    }

    fn description(&self) -> &str {
        "Fetch the description for a specific function from GTFOBins by name."
    }

    fn parameters_schema(&self) -> Value {
        single_string_param(
            "function_name",
            "The function name to query, for example:'file-read', 'suid'.",
        )
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let function_name = string_param(&params, "function_name");
        Ok(into_wire(Operation::QueryFunction, ctx.query().query_function(function_name)))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Ordered collection of tools, looked up by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry with the five GTFOBins tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ListBinariesTool));
        registry.register(Box::new(ListBinariesByFunctionTool));
        registry.register(Box::new(ListFunctionsTool));
        registry.register(Box::new(QueryBinaryTool));
        registry.register(Box::new(QueryFunctionTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Validate `params` against the named tool's schema and execute it.
    pub async fn call(&self, name: &str, params: Value, ctx: &ToolContext) -> Result<Value> {
        let Some(tool) = self.find(name) else {
            bail!("no tool registered with name: {}", name);
        };
        let params = validate_params(&tool.parameters_schema(), &params)?;
        tool.execute(params, ctx).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks required parameters and JSON types against a tool schema.
///
/// Returns the parameters as an object (an absent or `null` body is treated
/// as `{}`).
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params_obj = match params {
        Value::Object(map) => map.clone(),
        Value::Null => serde_json::Map::new(),
        other => bail!("parameters must be a JSON object, got {}", json_type_name(other)),
    };

    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    for req_field in required {
        if !params_obj.contains_key(req_field) {
            bail!("missing required parameter: {}", req_field);
        }
    }

    if let Some(properties) = schema.get("properties").and_then(|p| p.as_object()) {
        for (prop_name, prop_schema) in properties {
            let Some(value) = params_obj.get(prop_name) else {
                continue;
            };
            if let Some(expected_type) = prop_schema.get("type").and_then(|t| t.as_str()) {
                let type_ok = match expected_type {
                    "string" => value.is_string(),
                    "integer" => value.is_i64() || value.is_u64(),
                    "number" => value.is_number(),
                    "boolean" => value.is_boolean(),
                    "array" => value.is_array(),
                    "object" => value.is_object(),
                    _ => true,
                };
                if !type_ok {
                    bail!(
                        "parameter '{}' must be of type '{}', got {}",
                        prop_name,
                        expected_type,
                        json_type_name(value)
                    );
                }
            }
        }
    }

    Ok(Value::Object(params_obj))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
