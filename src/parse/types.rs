//! Types produced by the command parser and consumed by the eval layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::eval::CommandCategory;

/// A supported CLI dialect, identified by its binary name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    Kubectl,
    Az,
}

impl CommandType {
    /// Every registered dialect.
    pub const ALL: [CommandType; 2] = [CommandType::Kubectl, CommandType::Az];

    /// The binary name that introduces this dialect on a command line.
    pub fn binary(self) -> &'static str {
        match self {
            CommandType::Kubectl => "kubectl",
            CommandType::Az => "az",
        }
    }

    /// Exact binary-name lookup. No path stripping, no case folding.
    pub fn from_binary(binary: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.binary() == binary)
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for CommandType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_binary(s.trim())
            .ok_or_else(|| format!("unknown dialect '{s}' (expected 'kubectl' or 'az')"))
    }
}

/// Kubernetes namespace targeting implied by a single namespace-related flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    /// No namespace flag present.
    Unspecified,
    /// `-n <name>`, `--namespace=<name>` and friends.
    Specific(String),
    /// `-A` / `--all-namespaces`.
    All,
}

/// A tokenized, classified command. Built fresh per authorization call.
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    /// Dialect the command was parsed under.
    pub command_type: CommandType,
    /// Matched verb phrase (e.g. `get`, `auth can-i`), or the first token if nothing matched.
    pub verb: String,
    /// Category of `verb` in the dialect's table.
    pub category: CommandCategory,
    /// Every token after the binary name, verb included.
    pub tokens: Vec<String>,
    /// Number of leading tokens consumed by `verb`.
    pub verb_len: usize,
    /// Every namespace-scope flag occurrence, in token order.
    pub namespace_scopes: Vec<NamespaceScope>,
}

impl ParsedCommand {
    /// Tokens following the verb phrase.
    pub fn args(&self) -> &[String] {
        self.tokens.get(self.verb_len..).unwrap_or(&[])
    }

    /// The first namespace-scope flag in token order, or `Unspecified`.
    pub fn namespace_scope(&self) -> NamespaceScope {
        self.namespace_scopes
            .first()
            .cloned()
            .unwrap_or(NamespaceScope::Unspecified)
    }
}
