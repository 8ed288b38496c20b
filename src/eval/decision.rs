use std::fmt;

use serde::{Deserialize, Serialize};

use super::policy::AccessLevel;
use crate::parse::CommandType;

/// Risk category of a verb within its dialect.
///
/// `Unknown` is the fallback for verbs absent from every table and is never
/// authorized, whatever the access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Read,
    Write,
    Admin,
    Unknown,
}

impl CommandCategory {
    /// Minimum access level that permits this category. `None` for `Unknown`.
    pub fn required_level(self) -> Option<AccessLevel> {
        match self {
            CommandCategory::Read => Some(AccessLevel::ReadOnly),
            CommandCategory::Write => Some(AccessLevel::ReadWrite),
            CommandCategory::Admin => Some(AccessLevel::Admin),
            CommandCategory::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommandCategory::Read => "read",
            CommandCategory::Write => "write",
            CommandCategory::Admin => "admin",
            CommandCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CommandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command that passed authorization, ready for an executor.
///
/// Only the [`Authorizer`](super::Authorizer) constructs these, so holding one
/// is proof the argument vector was checked against a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedCommand {
    command_type: CommandType,
    verb: String,
    category: CommandCategory,
    argv: Vec<String>,
}

impl AuthorizedCommand {
    pub(crate) fn new(
        command_type: CommandType,
        verb: String,
        category: CommandCategory,
        argv: Vec<String>,
    ) -> Self {
        Self {
            command_type,
            verb,
            category,
            argv,
        }
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn category(&self) -> CommandCategory {
        self.category
    }

    /// Arguments to pass to the binary, verb first.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Human-readable summary for logs.
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.category, self.command_type, self.verb)
    }
}
