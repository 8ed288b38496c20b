//! Tool-call glue: argument extraction, authorization, and hand-off to executors.
//!
//! Executors only ever receive an [`AuthorizedCommand`], so nothing reaches a
//! subprocess or the cluster API without passing the authorizer first.

/// Tool descriptions listing the verbs permitted at an access level.
pub mod description;
/// `CommandToolHandler`: the generic CLI-command tool.
pub mod handler;
/// Local subprocess executor.
pub mod process;
/// Cluster run-command executor and its request context.
pub mod runcommand;

pub use description::describe_kubectl_tool;
pub use handler::{CommandToolHandler, command_argument, extract_tool_context};
pub use process::ProcessExecutor;
pub use runcommand::{AksResourceId, RequestContext, RunCommandClient, RunCommandExecutor, RunCommandOutput};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::GateError;
use crate::eval::AuthorizedCommand;
use crate::parse::CommandType;

/// An incoming tool call.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// What the tool call returns to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub text: String,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Per-call data that travels beside the command and is used only for execution.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Tool arguments with `_tool_context` removed.
    pub arguments: Map<String, Value>,
    /// Serialized `request_context` from `_tool_context`, if any.
    pub request_context: Option<String>,
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("failed to extract request context: {0}")]
    RequestContext(String),
    #[error("{message}")]
    Execution { message: String, output: String },
}

/// Runs commands that already passed authorization.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, command: &AuthorizedCommand, context: &CallContext) -> Result<String, ToolError>;
}

/// Dialect implied by a tool name, if the tool is dedicated to one CLI.
pub fn dialect_for_tool(name: &str) -> Option<CommandType> {
    match name {
        "call_kubectl" | "kubectl" => Some(CommandType::Kubectl),
        "call_az" | "az_cli" | "az" => Some(CommandType::Az),
        _ => None,
    }
}
