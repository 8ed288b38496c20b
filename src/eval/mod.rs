pub mod decision;
pub mod policy;

pub use decision::{AuthorizedCommand, CommandCategory};
pub use policy::{AccessLevel, NamespacePolicy, ParseAccessLevelError, PolicyHandle, SecurityPolicy};

use std::collections::HashMap;

use log::debug;

use crate::commands::{AzSpec, Classification, DialectSpec, KubectlSpec};
use crate::config::Config;
use crate::error::{ConfigError, Denial, GateError, MalformedCommand};
use crate::parse::{self, CommandType, NamespaceScope, ParsedCommand};

/// Registry of dialect specs, keyed by dialect.
///
/// Immutable once built; share it behind an `Arc` and call it from any thread.
pub struct Authorizer {
    dialects: HashMap<CommandType, Box<dyn DialectSpec>>,
}

impl Authorizer {
    /// Build the registry from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut dialects: HashMap<CommandType, Box<dyn DialectSpec>> = HashMap::new();
        dialects.insert(
            CommandType::Kubectl,
            Box::new(KubectlSpec::from_config(&config.kubectl)?),
        );
        dialects.insert(CommandType::Az, Box::new(AzSpec::from_config(&config.az)?));
        Ok(Self { dialects })
    }

    /// Look up a dialect spec.
    pub fn dialect(&self, command_type: CommandType) -> Option<&dyn DialectSpec> {
        self.dialects.get(&command_type).map(|b| b.as_ref())
    }

    /// Detect, tokenize and classify a raw command.
    pub fn parse(
        &self,
        raw: &str,
        hint: Option<CommandType>,
    ) -> Result<ParsedCommand, MalformedCommand> {
        let (command_type, rest) = parse::detect(raw, hint)?;
        let spec = self
            .dialect(command_type)
            .ok_or_else(|| MalformedCommand::UnsupportedBinary {
                binary: command_type.binary().to_string(),
            })?;

        let tokens = parse::tokenize(rest)?;
        if tokens.is_empty() {
            return Err(MalformedCommand::Empty);
        }

        let Classification {
            verb,
            category,
            verb_len,
        } = spec.classify(&tokens);
        let namespace_scopes = spec.namespace_scopes(tokens.get(verb_len..).unwrap_or(&[]));

        Ok(ParsedCommand {
            command_type,
            verb,
            category,
            tokens,
            verb_len,
            namespace_scopes,
        })
    }

    /// Authorize a raw command and return it in executable form.
    ///
    /// `hint` pins the dialect for handlers dedicated to one CLI; without it
    /// the leading binary name decides.
    pub fn check(
        &self,
        raw: &str,
        hint: Option<CommandType>,
        policy: &SecurityPolicy,
    ) -> Result<AuthorizedCommand, GateError> {
        let parsed = self.parse(raw, hint)?;
        debug!(
            "classified {} '{}' as {} (namespace scope {:?})",
            parsed.command_type,
            parsed.verb,
            parsed.category,
            parsed.namespace_scope()
        );

        decide(&parsed, policy)?;

        if let Some(spec) = self.dialect(parsed.command_type) {
            for embedded in spec.embedded_command(&parsed)? {
                debug!("checking embedded command: {embedded}");
                self.check_embedded(&embedded, policy)?;
            }
        }

        Ok(AuthorizedCommand::new(
            parsed.command_type,
            parsed.verb,
            parsed.category,
            parsed.tokens,
        ))
    }

    /// Embedded commands must be plain kubectl invocations and pass on their
    /// own. They run through a shell on the cluster, so any shell syntax is
    /// refused before parsing.
    fn check_embedded(&self, embedded: &str, policy: &SecurityPolicy) -> Result<(), GateError> {
        if let Some(found) = parse::shell_syntax(embedded) {
            return Err(MalformedCommand::EmbeddedShellSyntax { found }.into());
        }
        let (command_type, _) = parse::detect(embedded, None)?;
        if command_type != CommandType::Kubectl {
            return Err(MalformedCommand::UnsupportedBinary {
                binary: command_type.binary().to_string(),
            }
            .into());
        }
        self.check(embedded, Some(CommandType::Kubectl), policy)
            .map(|_| ())
    }

    /// Authorize a raw command, detecting its dialect from the binary name.
    pub fn authorize(&self, raw: &str, policy: &SecurityPolicy) -> Result<(), GateError> {
        self.check(raw, None, policy).map(|_| ())
    }

    /// Verb phrases of `category` for a dialect, in configuration order.
    pub fn verbs(&self, command_type: CommandType, category: CommandCategory) -> Vec<&str> {
        self.dialect(command_type)
            .map(|spec| spec.table().verbs(category))
            .unwrap_or_default()
    }
}

/// The decision function. Checks run in a fixed order and the first failure
/// is the one reported:
///
/// 1. unknown verb
/// 2. category above the granted access level
/// 3. all-namespaces under a restricted namespace policy
/// 4. a specific namespace outside the allow-list
///
/// Under a restricted policy every namespace flag occurrence is checked in
/// token order, so a permitted `-n` cannot mask a later `-A`.
pub fn decide(parsed: &ParsedCommand, policy: &SecurityPolicy) -> Result<(), Denial> {
    let granted = policy.access_level();
    match parsed.category.required_level() {
        None => {
            return Err(Denial::UnrecognizedCommand {
                verb: parsed.verb.clone(),
            });
        }
        Some(required) if required > granted => {
            return Err(Denial::InsufficientAccess {
                verb: parsed.verb.clone(),
                category: parsed.category,
                granted,
            });
        }
        Some(_) => {}
    }

    let namespaces = policy.namespaces();
    if !namespaces.is_restricted() {
        return Ok(());
    }
    for scope in &parsed.namespace_scopes {
        match scope {
            NamespaceScope::All => return Err(Denial::AllNamespaces),
            NamespaceScope::Specific(name) if !namespaces.permits(name) => {
                return Err(Denial::NamespaceNotPermitted {
                    namespace: name.clone(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}
