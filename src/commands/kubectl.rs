//! kubectl dialect.
//!
//! The verb is the leading token (or token pair, e.g. `auth can-i`). Leading
//! global flags are not skipped: `kubectl -n prod delete ...` classifies `-n`
//! and fails closed as an unrecognized command.

use super::{DialectSpec, VerbTable};
use crate::config::VerbConfig;
use crate::error::ConfigError;
use crate::parse::{self, CommandType, NamespaceScope};

pub struct KubectlSpec {
    table: VerbTable,
}

impl KubectlSpec {
    /// Build a kubectl spec from configuration.
    pub fn from_config(config: &VerbConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            table: VerbTable::from_config(CommandType::Kubectl, config)?,
        })
    }
}

impl DialectSpec for KubectlSpec {
    fn command_type(&self) -> CommandType {
        CommandType::Kubectl
    }

    fn table(&self) -> &VerbTable {
        &self.table
    }

    fn namespace_scopes(&self, args: &[String]) -> Vec<NamespaceScope> {
        parse::kubectl_scopes(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::eval::CommandCategory;

    fn spec() -> KubectlSpec {
        KubectlSpec::from_config(&Config::default_config().kubectl).unwrap()
    }

    fn category(cmd: &str) -> CommandCategory {
        let tokens = parse::tokenize(cmd).unwrap();
        spec().classify(&tokens).category
    }

    #[test]
    fn read_verbs() {
        for cmd in [
            "get pods",
            "describe deployment myapp",
            "logs nginx-pod -f",
            "top pods",
            "events --all-namespaces",
            "explain pods.spec.containers",
            "auth can-i create pods",
        ] {
            assert_eq!(category(cmd), CommandCategory::Read, "{cmd}");
        }
    }

    #[test]
    fn write_verbs() {
        for cmd in [
            "create -f deployment.yaml",
            "apply -f deployment.yaml",
            "delete pod nginx-pod",
            "scale deployment myapp --replicas=3",
            "rollout status deployment/myapp",
            "label pods foo unhealthy=true",
            "exec nginx-pod -- date",
            "config use-context my-cluster-context",
        ] {
            assert_eq!(category(cmd), CommandCategory::Write, "{cmd}");
        }
    }

    #[test]
    fn admin_verbs() {
        for cmd in ["drain node1", "cordon node1", "uncordon node1"] {
            assert_eq!(category(cmd), CommandCategory::Admin, "{cmd}");
        }
    }

    #[test]
    fn unknown_verbs() {
        assert_eq!(category("frobnicate pods"), CommandCategory::Unknown);
        assert_eq!(category("auth"), CommandCategory::Unknown);
        assert_eq!(category("-n prod delete pod x"), CommandCategory::Unknown);
    }

    #[test]
    fn namespace_rules_apply() {
        let tokens = parse::tokenize("pods -n default").unwrap();
        assert_eq!(
            spec().namespace_scopes(&tokens),
            vec![NamespaceScope::Specific("default".into())]
        );
    }

    #[test]
    fn no_embedded_commands() {
        let parsed = crate::eval::Authorizer::from_config(&Config::default_config())
            .unwrap()
            .parse("kubectl exec web -c app -- kubectl drain node1", None)
            .unwrap();
        assert_eq!(spec().embedded_command(&parsed), Ok(Vec::new()));
    }
}
