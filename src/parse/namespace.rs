//! Namespace scope extraction for kubectl-style flags.
//!
//! Recognizes every spelling kubectl's flag parser accepts for the namespace
//! and all-namespaces flags: `-n v`, `-nv`, `-n=v`, `--namespace v`,
//! `--namespace=v`, `-A`, `-A=<bool>`, `--all-namespaces`,
//! `--all-namespaces=<bool>`, and boolean shorthand clusters such as `-wA`.
//! Scanning stops at `--`; what follows belongs to a remote command.

use super::types::NamespaceScope;

/// Shorthands that take a value under every kubectl command, so the rest of a
/// cluster is their argument. Shorthands that are boolean for some verbs
/// (`logs -f`, `logs -p`, `version -c`) are scanned through instead: a
/// misread there can only add scopes, never hide one.
const VALUE_SHORTHANDS: &[char] = &['k', 'l', 'L', 'o', 's', 'v'];

/// Every namespace-scope flag occurrence in `args`, in token order.
pub fn kubectl_scopes(args: &[String]) -> Vec<NamespaceScope> {
    let mut scopes = Vec::new();
    let mut iter = args.iter().peekable();

    while let Some(token) = iter.next() {
        if token == "--" {
            break;
        }
        let next = iter.peek().copied().map(String::as_str);
        let found = if let Some(long) = token.strip_prefix("--") {
            long_flag(long, next)
        } else if let Some(cluster) = token.strip_prefix('-') {
            shorthand_cluster(cluster, next)
        } else {
            None
        };

        if let Some((scope, consumed_next)) = found {
            scopes.push(scope);
            if consumed_next {
                iter.next();
            }
        }
    }

    scopes
}

/// First namespace-scope flag in `args`, or `Unspecified`.
pub fn kubectl_scope(args: &[String]) -> NamespaceScope {
    kubectl_scopes(args)
        .into_iter()
        .next()
        .unwrap_or(NamespaceScope::Unspecified)
}

fn long_flag(flag: &str, next: Option<&str>) -> Option<(NamespaceScope, bool)> {
    match flag.split_once('=') {
        Some(("all-namespaces", value)) => all_namespaces(value).map(|s| (s, false)),
        Some(("namespace", value)) => Some((NamespaceScope::Specific(value.to_string()), false)),
        Some(_) => None,
        None => match flag {
            "all-namespaces" => Some((NamespaceScope::All, false)),
            "namespace" => next.map(|v| (NamespaceScope::Specific(v.to_string()), true)),
            _ => None,
        },
    }
}

fn shorthand_cluster(cluster: &str, next: Option<&str>) -> Option<(NamespaceScope, bool)> {
    for (idx, c) in cluster.char_indices() {
        let rest = &cluster[idx + c.len_utf8()..];
        match c {
            'A' => {
                return match rest.strip_prefix('=') {
                    Some(value) => all_namespaces(value).map(|s| (s, false)),
                    None => Some((NamespaceScope::All, false)),
                };
            }
            'n' => {
                if let Some(value) = rest.strip_prefix('=') {
                    return Some((NamespaceScope::Specific(value.to_string()), false));
                }
                if !rest.is_empty() {
                    return Some((NamespaceScope::Specific(rest.to_string()), false));
                }
                return next.map(|v| (NamespaceScope::Specific(v.to_string()), true));
            }
            '=' => return None,
            c if VALUE_SHORTHANDS.contains(&c) => return None,
            _ => {}
        }
    }
    None
}

/// `--all-namespaces=<value>`: an explicit false disables the flag, anything
/// unparseable counts as all namespaces.
fn all_namespaces(value: &str) -> Option<NamespaceScope> {
    match parse_bool(value) {
        Some(false) => None,
        _ => Some(NamespaceScope::All),
    }
}

/// Boolean spellings accepted by kubectl's flag parser.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(args: &str) -> NamespaceScope {
        let tokens: Vec<String> = args.split_whitespace().map(String::from).collect();
        kubectl_scope(&tokens)
    }

    fn specific(name: &str) -> NamespaceScope {
        NamespaceScope::Specific(name.into())
    }

    #[test]
    fn unspecified() {
        assert_eq!(scope("pods"), NamespaceScope::Unspecified);
        assert_eq!(scope(""), NamespaceScope::Unspecified);
    }

    #[test]
    fn short_flag_with_value() {
        assert_eq!(scope("pods -n default"), specific("default"));
    }

    #[test]
    fn long_flag_with_value() {
        assert_eq!(scope("pods --namespace prod"), specific("prod"));
    }

    #[test]
    fn long_flag_equals() {
        assert_eq!(scope("pods --namespace=production"), specific("production"));
    }

    #[test]
    fn short_flag_equals() {
        assert_eq!(scope("pods -n=prod"), specific("prod"));
    }

    #[test]
    fn short_flag_attached() {
        assert_eq!(scope("pods -nkube-system"), specific("kube-system"));
    }

    #[test]
    fn dangling_namespace_flag() {
        assert_eq!(scope("pods -n"), NamespaceScope::Unspecified);
        assert_eq!(scope("pods --namespace"), NamespaceScope::Unspecified);
    }

    #[test]
    fn all_short() {
        assert_eq!(scope("pods -A"), NamespaceScope::All);
    }

    #[test]
    fn all_long() {
        assert_eq!(scope("pods --all-namespaces"), NamespaceScope::All);
    }

    #[test]
    fn all_long_bool_values() {
        assert_eq!(scope("pods --all-namespaces=true"), NamespaceScope::All);
        assert_eq!(scope("pods --all-namespaces=1"), NamespaceScope::All);
        assert_eq!(scope("pods --all-namespaces=false"), NamespaceScope::Unspecified);
        assert_eq!(scope("pods -A=false"), NamespaceScope::Unspecified);
        assert_eq!(scope("pods -A=T"), NamespaceScope::All);
    }

    #[test]
    fn all_unparseable_value_counts_as_all() {
        assert_eq!(scope("pods --all-namespaces=yes"), NamespaceScope::All);
    }

    #[test]
    fn false_all_then_specific() {
        assert_eq!(
            scope("pods --all-namespaces=false -n default"),
            specific("default")
        );
    }

    #[test]
    fn bool_cluster_with_all() {
        assert_eq!(scope("pods -wA"), NamespaceScope::All);
        assert_eq!(scope("pods -Aw"), NamespaceScope::All);
    }

    #[test]
    fn bool_cluster_with_namespace() {
        assert_eq!(scope("pods -wnprod"), specific("prod"));
        assert_eq!(scope("pods -wn prod"), specific("prod"));
    }

    #[test]
    fn value_shorthand_swallows_rest() {
        // -o takes a value, so "name" is its argument, not -n + "ame".
        assert_eq!(scope("pods -oname"), NamespaceScope::Unspecified);
        assert_eq!(scope("pods -lapp=nginx"), NamespaceScope::Unspecified);
    }

    #[test]
    fn verb_dependent_booleans_are_scanned_through() {
        assert_eq!(scope("mypod -fn kube-system"), specific("kube-system"));
        assert_eq!(scope("mypod -fnkube-system"), specific("kube-system"));
        assert_eq!(scope("mypod -pn kube-system"), specific("kube-system"));
        assert_eq!(scope("mypod -fA"), NamespaceScope::All);
        assert_eq!(scope("mypod -cnginx"), specific("ginx"));
    }

    #[test]
    fn first_occurrence_wins() {
        assert_eq!(scope("pods -n foo -A"), specific("foo"));
        assert_eq!(scope("pods -A -n foo"), NamespaceScope::All);
    }

    #[test]
    fn all_occurrences_collected() {
        let tokens: Vec<String> = "pods -n foo --namespace=bar -A"
            .split_whitespace()
            .map(String::from)
            .collect();
        assert_eq!(
            kubectl_scopes(&tokens),
            vec![specific("foo"), specific("bar"), NamespaceScope::All]
        );
    }

    #[test]
    fn consumed_value_is_not_rescanned() {
        // "-A" here is the namespace value, the way kubectl reads it.
        let tokens: Vec<String> = ["pods", "-n", "-A"].iter().map(|s| s.to_string()).collect();
        assert_eq!(kubectl_scopes(&tokens), vec![specific("-A")]);
    }

    #[test]
    fn stops_at_double_dash() {
        assert_eq!(scope("mypod -- ls -A"), NamespaceScope::Unspecified);
        assert_eq!(scope("mypod -n web -- ls -n x"), specific("web"));
    }

    #[test]
    fn lone_dash_is_not_a_flag() {
        assert_eq!(scope("-f -"), NamespaceScope::Unspecified);
    }

    #[test]
    fn unrelated_long_flags() {
        assert_eq!(scope("pods --namespaces=foo --all"), NamespaceScope::Unspecified);
    }
}
