//! Error types surfaced by the authorization engine.
//!
//! Two disjoint kinds reach callers: [`MalformedCommand`] (the invocation can
//! never work) and [`Denial`] (the invocation is not allowed under the current
//! policy). [`GateError`] wraps both and renders them behind stable prefixes so
//! downstream handlers can tell them apart without matching full messages.

use thiserror::Error;

use crate::eval::{AccessLevel, CommandCategory};

/// Prefix carried by every authorization denial.
pub const DENIED_PREFIX: &str = "security validation failed";

/// Prefix carried by every malformed-command rejection.
pub const MALFORMED_PREFIX: &str = "malformed command";

/// Any rejection produced while authorizing a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("malformed command: {0}")]
    Malformed(#[from] MalformedCommand),
    #[error("security validation failed: {0}")]
    Denied(#[from] Denial),
}

impl GateError {
    /// True when the command was well-formed but not allowed by policy.
    pub fn is_denial(&self) -> bool {
        matches!(self, GateError::Denied(_))
    }

    /// Short label used in decision logs and binary output.
    pub fn kind(&self) -> &'static str {
        match self {
            GateError::Malformed(_) => "malformed",
            GateError::Denied(_) => "denied",
        }
    }
}

/// The command string cannot be interpreted as a single supported invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedCommand {
    #[error("empty command")]
    Empty,
    #[error("unsupported binary '{binary}': command must start with 'kubectl' or 'az'")]
    UnsupportedBinary { binary: String },
    #[error("unbalanced quotes or trailing escape")]
    UnbalancedQuotes,
    #[error("'{verb}' requires an embedded --command value")]
    EmbeddedCommandMissing { verb: String },
    #[error("embedded command contains shell syntax '{found}'")]
    EmbeddedShellSyntax { found: char },
}

/// The command is well-formed but the active policy does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("unrecognized command: {verb}")]
    UnrecognizedCommand { verb: String },
    #[error("access level insufficient for {verb} ({category} requires more than {granted})")]
    InsufficientAccess {
        verb: String,
        category: CommandCategory,
        granted: AccessLevel,
    },
    #[error("all-namespaces access not permitted")]
    AllNamespaces,
    #[error("namespace {namespace} not permitted")]
    NamespaceNotPermitted { namespace: String },
}

/// Failure to load or validate configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("{dialect} verb '{verb}' is listed under more than one category")]
    DuplicateVerb { dialect: String, verb: String },
}
