use std::process::Command;

use log::debug;

use super::{CallContext, CommandExecutor, ToolError};
use crate::eval::AuthorizedCommand;

/// Runs authorized commands as local subprocesses.
///
/// The binary is chosen from the command's dialect and the checked argument
/// vector is passed as-is; no shell is involved.
#[derive(Debug, Default, Clone)]
pub struct ProcessExecutor;

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, command: &AuthorizedCommand, _context: &CallContext) -> Result<String, ToolError> {
        let binary = command.command_type().binary();
        debug!("spawning {binary} {:?}", command.argv());

        let output = Command::new(binary)
            .args(command.argv())
            .output()
            .map_err(|e| ToolError::Execution {
                message: format!("failed to run {binary}: {e}"),
                output: String::new(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = match output.status.code() {
            Some(code) => format!("{binary} exited with code {code}"),
            None => format!("{binary} terminated by signal"),
        };
        let mut combined = stdout;
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }
        Err(ToolError::Execution {
            message,
            output: combined,
        })
    }
}
