//! Azure CLI dialect.
//!
//! az verbs are command-group paths (`aks nodepool list`), so every table
//! entry is a multi-word phrase. `-n` means resource name here, so no
//! namespace scope is ever extracted from az flags. The exception is
//! `aks command invoke`, whose `--command` runs a kubectl command inside the
//! cluster; that embedded command is authorized separately.

use super::{DialectSpec, VerbTable};
use crate::config::VerbConfig;
use crate::error::{ConfigError, MalformedCommand};
use crate::parse::{CommandType, NamespaceScope, ParsedCommand};

/// Verb phrase whose `--command` value is executed in the cluster.
const COMMAND_INVOKE: &str = "aks command invoke";

/// Long option carrying the embedded command, without its dashes.
const COMMAND_FLAG: &str = "command";

pub struct AzSpec {
    table: VerbTable,
}

impl AzSpec {
    /// Build an az spec from configuration.
    pub fn from_config(config: &VerbConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            table: VerbTable::from_config(CommandType::Az, config)?,
        })
    }

    /// Every `--command`/`-c` value in the arguments, in order.
    ///
    /// az's argument parser keeps the last of a repeated option and accepts
    /// unambiguous long-option prefixes (`--comm`) and attached short values
    /// (`-cVALUE`), so all of those spellings are collected.
    fn command_values(args: &[String]) -> Vec<&str> {
        let mut values = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if let Some(long) = arg.strip_prefix("--") {
                let (name, inline) = match long.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (long, None),
                };
                if name.is_empty() || !COMMAND_FLAG.starts_with(name) {
                    continue;
                }
                match inline {
                    Some(value) => values.push(value),
                    None => values.extend(iter.next().map(String::as_str)),
                }
            } else if let Some(short) = arg.strip_prefix("-c") {
                if short.is_empty() {
                    values.extend(iter.next().map(String::as_str));
                } else {
                    values.push(short);
                }
            }
        }
        values
    }
}

impl DialectSpec for AzSpec {
    fn command_type(&self) -> CommandType {
        CommandType::Az
    }

    fn table(&self) -> &VerbTable {
        &self.table
    }

    fn namespace_scopes(&self, _args: &[String]) -> Vec<NamespaceScope> {
        Vec::new()
    }

    fn embedded_command(&self, parsed: &ParsedCommand) -> Result<Vec<String>, MalformedCommand> {
        if parsed.verb != COMMAND_INVOKE {
            return Ok(Vec::new());
        }
        let values: Vec<String> = Self::command_values(parsed.args())
            .into_iter()
            .map(String::from)
            .collect();
        if values.is_empty() {
            return Err(MalformedCommand::EmbeddedCommandMissing {
                verb: parsed.verb.clone(),
            });
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::eval::CommandCategory;
    use crate::parse;

    fn spec() -> AzSpec {
        AzSpec::from_config(&Config::default_config().az).unwrap()
    }

    fn parsed(cmd: &str) -> ParsedCommand {
        let tokens = parse::tokenize(cmd).unwrap();
        let c = spec().classify(&tokens);
        ParsedCommand {
            command_type: CommandType::Az,
            verb: c.verb,
            category: c.category,
            tokens,
            verb_len: c.verb_len,
            namespace_scopes: Vec::new(),
        }
    }

    #[test]
    fn read_phrases() {
        for cmd in [
            "aks show -g rg -n cluster",
            "aks list",
            "aks nodepool list -g rg --cluster-name c",
            "network vnet list -g rg",
            "account show",
        ] {
            assert_eq!(parsed(cmd).category, CommandCategory::Read, "{cmd}");
        }
    }

    #[test]
    fn write_phrases() {
        for cmd in [
            "aks scale -g rg -n c --node-count 3",
            "aks nodepool add -g rg --cluster-name c -n np2",
            "aks command invoke -g rg -n c --command 'kubectl get pods'",
        ] {
            assert_eq!(parsed(cmd).category, CommandCategory::Write, "{cmd}");
        }
    }

    #[test]
    fn admin_phrases() {
        for cmd in ["aks delete -g rg -n c", "aks nodepool delete -g rg --cluster-name c -n np"] {
            assert_eq!(parsed(cmd).category, CommandCategory::Admin, "{cmd}");
        }
    }

    #[test]
    fn bare_group_is_unknown() {
        assert_eq!(parsed("aks").category, CommandCategory::Unknown);
        assert_eq!(parsed("aks nodepool").category, CommandCategory::Unknown);
    }

    #[test]
    fn name_flag_is_not_namespace() {
        let p = parsed("aks show -n kube-system");
        assert!(spec().namespace_scopes(p.args()).is_empty());
    }

    #[test]
    fn embedded_command_extracted() {
        let p = parsed("aks command invoke -g rg -n c --command 'kubectl get pods -A'");
        assert_eq!(
            spec().embedded_command(&p),
            Ok(vec!["kubectl get pods -A".to_string()])
        );

        let p = parsed("aks command invoke -g rg -n c -c 'kubectl get ns'");
        assert_eq!(spec().embedded_command(&p), Ok(vec!["kubectl get ns".to_string()]));

        let p = parsed("aks command invoke -g rg -n c --command='kubectl top pods'");
        assert_eq!(spec().embedded_command(&p), Ok(vec!["kubectl top pods".to_string()]));
    }

    #[test]
    fn every_repeated_command_collected() {
        let p = parsed(
            "aks command invoke -g rg -n c --command 'kubectl get pods' -c 'kubectl drain node1'",
        );
        assert_eq!(
            spec().embedded_command(&p),
            Ok(vec!["kubectl get pods".to_string(), "kubectl drain node1".to_string()])
        );
    }

    #[test]
    fn abbreviated_and_attached_spellings_collected() {
        let p = parsed("aks command invoke -g rg -n c --comm 'kubectl get ns' -c'kubectl top pods'");
        assert_eq!(
            spec().embedded_command(&p),
            Ok(vec!["kubectl get ns".to_string(), "kubectl top pods".to_string()])
        );

        let p = parsed("aks command invoke -g rg -n c --co='kubectl get ns'");
        assert_eq!(spec().embedded_command(&p), Ok(vec!["kubectl get ns".to_string()]));
    }

    #[test]
    fn embedded_command_missing() {
        let p = parsed("aks command invoke -g rg -n c");
        assert!(matches!(
            spec().embedded_command(&p),
            Err(MalformedCommand::EmbeddedCommandMissing { .. })
        ));
    }

    #[test]
    fn other_verbs_have_no_embedded_command() {
        let p = parsed("aks show -g rg -n c --command foo");
        assert_eq!(spec().embedded_command(&p), Ok(Vec::new()));
    }
}
