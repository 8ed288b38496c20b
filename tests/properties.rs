//! Property tests: the gate is total, monotonic in access level, and never
//! authorizes a namespace scope outside a restricted allow-list.

use std::sync::Arc;

use kubegate::config::Config;
use kubegate::error::{DENIED_PREFIX, MALFORMED_PREFIX};
use kubegate::eval::{AccessLevel, Authorizer, CommandCategory, PolicyHandle, SecurityPolicy};
use kubegate::parse::{CommandType, NamespaceScope};
use proptest::prelude::*;

fn authorizer() -> Authorizer {
    Authorizer::from_config(&Config::default_config()).unwrap()
}

/// Tokens that exercise verbs, namespace flags in all spellings, and quoting.
fn token() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "get", "delete", "drain", "apply", "auth", "can-i", "logs", "pods", "deploy/web",
        "-n", "-A", "-wA", "-nprod", "-fn", "-pn", "-n=prod", "--namespace", "--namespace=prod",
        "--all-namespaces", "--all-namespaces=false", "--all-namespaces=1", "-l",
        "app=web", "-o", "yaml", "default", "kube-system", "--", "ls", "'quoted value'",
    ])
    .prop_map(String::from)
}

fn kubectl_command() -> impl Strategy<Value = String> {
    prop::collection::vec(token(), 1..8).prop_map(|tokens| format!("kubectl {}", tokens.join(" ")))
}

fn access_level() -> impl Strategy<Value = AccessLevel> {
    prop::sample::select(AccessLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn any_input_is_decided(raw in ".{0,96}") {
        let policy = SecurityPolicy::from_parts(AccessLevel::Admin, "default");
        if let Err(e) = kubegate::authorize(&raw, &policy) {
            let msg = e.to_string();
            prop_assert!(msg.starts_with(DENIED_PREFIX) || msg.starts_with(MALFORMED_PREFIX), "{msg}");
        }
    }

    #[test]
    fn higher_access_never_loses_permission(cmd in kubectl_command(), ns in prop::sample::select(vec!["", "default"])) {
        let a = authorizer();
        let mut previously_authorized = false;
        for level in AccessLevel::ALL {
            let authorized = a.authorize(&cmd, &SecurityPolicy::from_parts(level, ns)).is_ok();
            prop_assert!(authorized || !previously_authorized, "{cmd} lost permission at {level}");
            previously_authorized = authorized;
        }
    }

    #[test]
    fn authorized_scopes_stay_inside_allow_list(cmd in kubectl_command(), level in access_level()) {
        let a = authorizer();
        let policy = SecurityPolicy::from_parts(level, "default,staging");
        if a.authorize(&cmd, &policy).is_ok() {
            let parsed = a.parse(&cmd, None).unwrap();
            for scope in &parsed.namespace_scopes {
                match scope {
                    NamespaceScope::All => prop_assert!(false, "{cmd} authorized with all-namespaces"),
                    NamespaceScope::Specific(n) => prop_assert!(policy.namespaces().permits(n), "{cmd}"),
                    NamespaceScope::Unspecified => {}
                }
            }
        }
    }

    #[test]
    fn specific_namespace_authorized_iff_listed(ns in "[a-z][a-z0-9-]{0,12}") {
        let policy = SecurityPolicy::from_parts(AccessLevel::ReadOnly, "default,staging");
        let result = kubegate::authorize(&format!("kubectl get pods -n {ns}"), &policy);
        prop_assert_eq!(result.is_ok(), ns == "default" || ns == "staging");
    }

    #[test]
    fn all_namespaces_denied_when_restricted(
        flag in prop::sample::select(vec!["-A", "--all-namespaces", "-A=true", "--all-namespaces=t", "-wA"]),
        level in access_level(),
    ) {
        let policy = SecurityPolicy::from_parts(level, "default");
        let result = kubegate::authorize(&format!("kubectl get pods -n default {flag}"), &policy);
        prop_assert!(result.is_err());
    }

    #[test]
    fn unknown_verbs_denied_at_admin(verb in "[a-z]{3,12}") {
        let a = authorizer();
        let known: Vec<&str> = [CommandCategory::Read, CommandCategory::Write, CommandCategory::Admin]
            .into_iter()
            .flat_map(|c| a.verbs(CommandType::Kubectl, c))
            .filter_map(|phrase| phrase.split_whitespace().next())
            .collect();
        prop_assume!(!known.contains(&verb.as_str()));
        let result = a.authorize(&format!("kubectl {verb} pods"), &SecurityPolicy::from_parts(AccessLevel::Admin, ""));
        prop_assert!(result.is_err());
        prop_assert!(result.unwrap_err().is_denial());
    }
}

#[test]
fn concurrent_checks_see_whole_policies() {
    let a = Arc::new(authorizer());
    let handle = Arc::new(PolicyHandle::new(SecurityPolicy::from_parts(AccessLevel::ReadOnly, "")));

    std::thread::scope(|s| {
        for _ in 0..4 {
            let a = Arc::clone(&a);
            let handle = Arc::clone(&handle);
            s.spawn(move || {
                for _ in 0..200 {
                    let policy = handle.snapshot();
                    let result = a.authorize("kubectl delete pod x -n default", &policy);
                    // ReadOnly always denies; ReadWrite with {"default"} always authorizes.
                    match policy.access_level() {
                        AccessLevel::ReadOnly => assert!(result.is_err()),
                        _ => assert!(result.is_ok()),
                    }
                }
            });
        }
        s.spawn(|| {
            for i in 0..200 {
                let next = if i % 2 == 0 {
                    SecurityPolicy::from_parts(AccessLevel::ReadWrite, "default")
                } else {
                    SecurityPolicy::from_parts(AccessLevel::ReadOnly, "")
                };
                handle.replace(next);
            }
        });
    });
}
