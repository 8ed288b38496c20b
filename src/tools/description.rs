use crate::eval::{AccessLevel, Authorizer, CommandCategory};
use crate::parse::CommandType;

/// Description for the kubectl tool, listing the verbs the access level allows.
///
/// Built from the live verb tables so the description never drifts from what
/// the authorizer accepts.
pub fn describe_kubectl_tool(authorizer: &Authorizer, access_level: AccessLevel) -> String {
    let mut out = String::new();
    let access = match access_level {
        AccessLevel::ReadOnly => "read-only",
        AccessLevel::ReadWrite => "read and write",
        AccessLevel::Admin => "full administrative",
    };
    out.push_str(&format!("Execute kubectl commands with {access} access.\n\n"));
    out.push_str(
        "Pass the full kubectl command including the 'kubectl' prefix. \
         All standard kubectl flags are supported.\n\nAllowed commands:\n",
    );

    for category in [
        CommandCategory::Read,
        CommandCategory::Write,
        CommandCategory::Admin,
    ] {
        if !access_level.permits(category) {
            continue;
        }
        let verbs = authorizer.verbs(CommandType::Kubectl, category);
        if verbs.is_empty() {
            continue;
        }
        out.push_str(&format!("{}: {}\n", capitalize(category.as_str()), verbs.join(", ")));
    }

    out.push_str("\nExamples:\n- command='kubectl get pods -n default'\n");
    if access_level.permits(CommandCategory::Write) {
        out.push_str("- command='kubectl scale deployment myapp --replicas=3'\n");
    }
    if access_level.permits(CommandCategory::Admin) {
        out.push_str("- command='kubectl cordon node-1'\n");
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
