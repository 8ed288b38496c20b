//! kubegate: a fail-closed authorization gate for agent-submitted `kubectl`
//! and `az` command strings.
//!
//! A command is detected by dialect, tokenized, classified by its leading
//! verb into a [`CommandCategory`](eval::CommandCategory), and checked for
//! namespace scope. The decision against a
//! [`SecurityPolicy`](eval::SecurityPolicy) is either authorized or a
//! [`GateError`](error::GateError) whose message starts with
//! `security validation failed:` (denial) or `malformed command:`.
//!
//! # Architecture
//!
//! - **[`parse`]**: dialect detection, shlex tokenizer, namespace-scope extraction.
//! - **[`commands`]**: per-dialect verb tables and dialect specs (kubectl, az).
//! - **[`eval`]**: access levels, policies, the decision function and the [`Authorizer`](eval::Authorizer).
//! - **[`tools`]**: tool-call handler and executors that only accept authorized commands.
//! - **[`config`]**: embedded defaults plus user overlay merge.
//! - **[`logging`]**: decision log at `~/.local/share/kubegate/decisions.log`.

use std::sync::LazyLock;

/// Dialect specs and verb classification tables.
pub mod commands;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Rejection types and their stable message prefixes.
pub mod error;
/// Policies and the decision function.
pub mod eval;
/// File-based decision logging.
pub mod logging;
/// Command string parsing.
pub mod parse;
/// Tool-call surface and executors.
pub mod tools;

use error::GateError;
use eval::{Authorizer, SecurityPolicy};

static DEFAULT_AUTHORIZER: LazyLock<Authorizer> = LazyLock::new(|| {
    Authorizer::from_config(&config::Config::default_config())
        .expect("embedded default verb tables must be consistent")
});

/// Authorize a command against `policy` using the built-in verb tables.
///
/// This is the main entry point for tests and simple usage. For user
/// configuration, build an [`Authorizer`] from a loaded config.
pub fn authorize(command: &str, policy: &SecurityPolicy) -> Result<(), GateError> {
    DEFAULT_AUTHORIZER.authorize(command, policy)
}
