use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};

use super::{CallContext, CommandExecutor, ToolCall, ToolError, ToolResult};
use crate::eval::{AuthorizedCommand, Authorizer, PolicyHandle};
use crate::logging;
use crate::parse::CommandType;

/// Key under which the transport passes per-request context to the tool.
pub const TOOL_CONTEXT_KEY: &str = "_tool_context";

/// Tool-call payloads and results are logged up to this many bytes.
const MAX_LOGGED_BYTES: usize = 500;

/// A tool that takes a `command` argument, authorizes it against the active
/// policy, and hands the authorized form to an executor.
pub struct CommandToolHandler {
    name: String,
    dialect: Option<CommandType>,
    authorizer: Arc<Authorizer>,
    policy: Arc<PolicyHandle>,
    executor: Box<dyn CommandExecutor>,
}

impl CommandToolHandler {
    pub fn new(
        name: impl Into<String>,
        dialect: Option<CommandType>,
        authorizer: Arc<Authorizer>,
        policy: Arc<PolicyHandle>,
        executor: Box<dyn CommandExecutor>,
    ) -> Self {
        Self {
            name: name.into(),
            dialect,
            authorizer,
            policy,
            executor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Authorize the `command` argument against a fresh policy snapshot.
    pub fn authorize(&self, arguments: &Map<String, Value>) -> Result<AuthorizedCommand, ToolError> {
        let command = command_argument(arguments)?;
        let policy = self.policy.snapshot();
        let result = self.authorizer.check(command, self.dialect, &policy);
        logging::log_decision(command, &result);
        Ok(result?)
    }

    /// Run a full tool call. Failures become error results, never panics.
    pub fn handle(&self, call: ToolCall) -> ToolResult {
        let result = self.run(&call.name, call.arguments);
        let result = match result {
            Ok(output) => ToolResult::text(output),
            Err(ToolError::Execution { message, output }) if !output.is_empty() => {
                ToolResult::error(format!("{message}\n{output}"))
            }
            Err(e) => ToolResult::error(e.to_string()),
        };

        debug!(
            "tool result {} (error={}): {}",
            self.name,
            result.is_error,
            truncate(&result.text)
        );
        result
    }

    fn run(&self, tool: &str, mut arguments: Map<String, Value>) -> Result<String, ToolError> {
        let request_context = extract_tool_context(&mut arguments)?;
        debug!(
            "tool call {tool}: {}",
            truncate(&Value::Object(arguments.clone()).to_string())
        );
        let command = self.authorize(&arguments)?;
        let context = CallContext {
            arguments,
            request_context,
        };
        self.executor.execute(&command, &context)
    }
}

/// The required string `command` argument.
pub fn command_argument(arguments: &Map<String, Value>) -> Result<&str, ToolError> {
    match arguments.get("command") {
        Some(Value::String(command)) => Ok(command),
        Some(_) => Err(ToolError::InvalidArguments(
            "command parameter must be a string".into(),
        )),
        None => Err(ToolError::InvalidArguments(
            "command parameter is required".into(),
        )),
    }
}

/// Remove `_tool_context` from the arguments and return its serialized
/// `request_context`, which may arrive as a JSON object or a string.
pub fn extract_tool_context(arguments: &mut Map<String, Value>) -> Result<Option<String>, ToolError> {
    let Some(context) = arguments.remove(TOOL_CONTEXT_KEY) else {
        return Ok(None);
    };
    let Value::Object(mut context) = context else {
        return Err(ToolError::RequestContext(format!(
            "{TOOL_CONTEXT_KEY} must be an object"
        )));
    };
    match context.remove("request_context") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(value @ Value::Object(_)) => Ok(Some(value.to_string())),
        Some(_) => Err(ToolError::RequestContext(
            "request_context must be an object or a string".into(),
        )),
    }
}

fn truncate(s: &str) -> &str {
    if s.len() <= MAX_LOGGED_BYTES {
        return s;
    }
    let mut end = MAX_LOGGED_BYTES;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
