//! Per-dialect command specs: verb tables plus namespace-extraction rules.
//!
//! Each CLI family (kubectl, az) has its own `DialectSpec` implementation.
//! Adding a dialect means adding an implementation and registering it in the
//! [`Authorizer`](crate::eval::Authorizer); existing tables are untouched.

/// Azure CLI verb table and `aks command invoke` handling.
pub mod az;
/// kubectl verb table and namespace-flag extraction.
pub mod kubectl;
/// Longest-prefix verb phrase lookup.
pub mod table;

pub use az::AzSpec;
pub use kubectl::KubectlSpec;
pub use table::VerbTable;

use crate::error::MalformedCommand;
use crate::eval::CommandCategory;
use crate::parse::{CommandType, NamespaceScope, ParsedCommand};

/// Result of looking up a command's verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The matched phrase, or the first token when nothing matched.
    pub verb: String,
    pub category: CommandCategory,
    /// Number of leading tokens the verb consumed.
    pub verb_len: usize,
}

/// Trait for dialect specs.
///
/// Implementations are immutable after construction and shared across threads.
pub trait DialectSpec: Send + Sync {
    /// The dialect this spec handles.
    fn command_type(&self) -> CommandType;

    /// The dialect's verb table.
    fn table(&self) -> &VerbTable;

    /// Classify the tokens following the binary name.
    fn classify(&self, tokens: &[String]) -> Classification {
        self.table().classify(tokens)
    }

    /// Every namespace-scope flag occurrence in the post-verb arguments.
    fn namespace_scopes(&self, args: &[String]) -> Vec<NamespaceScope>;

    /// Nested commands this invocation may run. Each must pass
    /// authorization on its own.
    fn embedded_command(&self, _parsed: &ParsedCommand) -> Result<Vec<String>, MalformedCommand> {
        Ok(Vec::new())
    }
}
