//! Security policy values and the swappable handle that publishes them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::decision::CommandCategory;

/// Privilege tier granted to the agent. Ordered `ReadOnly < ReadWrite < Admin`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    ReadOnly,
    ReadWrite,
    Admin,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [AccessLevel::ReadOnly, AccessLevel::ReadWrite, AccessLevel::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::ReadOnly => "readonly",
            AccessLevel::ReadWrite => "readwrite",
            AccessLevel::Admin => "admin",
        }
    }

    /// Whether a verb of `category` may run at this level. Never true for `Unknown`.
    pub fn permits(self, category: CommandCategory) -> bool {
        category.required_level().is_some_and(|required| required <= self)
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid access level '{0}' (expected readonly, readwrite or admin)")]
pub struct ParseAccessLevelError(String);

impl FromStr for AccessLevel {
    type Err = ParseAccessLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "readonly" => Ok(AccessLevel::ReadOnly),
            "readwrite" => Ok(AccessLevel::ReadWrite),
            "admin" => Ok(AccessLevel::Admin),
            _ => Err(ParseAccessLevelError(s.to_string())),
        }
    }
}

/// Namespace allow-list. An empty configured list means `Unrestricted`,
/// never "nothing allowed".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NamespacePolicy {
    #[default]
    Unrestricted,
    Restricted(BTreeSet<String>),
}

impl NamespacePolicy {
    /// Build from namespace names. Blank entries are dropped; no entries
    /// left means unrestricted.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if set.is_empty() {
            NamespacePolicy::Unrestricted
        } else {
            NamespacePolicy::Restricted(set)
        }
    }

    /// Parse a comma-separated list such as `"default, kube-system"`.
    pub fn parse(csv: &str) -> Self {
        Self::from_names(csv.split(','))
    }

    pub fn is_restricted(&self) -> bool {
        matches!(self, NamespacePolicy::Restricted(_))
    }

    /// Whether `namespace` may be targeted explicitly.
    pub fn permits(&self, namespace: &str) -> bool {
        match self {
            NamespacePolicy::Unrestricted => true,
            NamespacePolicy::Restricted(allowed) => allowed.contains(namespace),
        }
    }
}

impl fmt::Display for NamespacePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespacePolicy::Unrestricted => f.write_str("unrestricted"),
            NamespacePolicy::Restricted(allowed) => {
                let names: Vec<&str> = allowed.iter().map(String::as_str).collect();
                f.write_str(&names.join(","))
            }
        }
    }
}

/// Immutable authorization policy. Changes produce a new value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityPolicy {
    access_level: AccessLevel,
    namespaces: NamespacePolicy,
}

impl SecurityPolicy {
    pub fn new(access_level: AccessLevel, namespaces: NamespacePolicy) -> Self {
        Self {
            access_level,
            namespaces,
        }
    }

    /// Build from the raw config values: a level and a comma-separated namespace list.
    pub fn from_parts(access_level: AccessLevel, allowed_namespaces: &str) -> Self {
        Self::new(access_level, NamespacePolicy::parse(allowed_namespaces))
    }

    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub fn namespaces(&self) -> &NamespacePolicy {
        &self.namespaces
    }
}

/// Shared, atomically replaceable reference to the active policy.
///
/// Callers take a [`snapshot`](Self::snapshot) per request; a concurrent
/// [`replace`](Self::replace) never affects a snapshot already taken.
#[derive(Debug)]
pub struct PolicyHandle {
    current: RwLock<Arc<SecurityPolicy>>,
}

impl PolicyHandle {
    pub fn new(policy: SecurityPolicy) -> Self {
        Self {
            current: RwLock::new(Arc::new(policy)),
        }
    }

    pub fn snapshot(&self) -> Arc<SecurityPolicy> {
        self.current.read().clone()
    }

    /// Swap in a new policy, returning the previous one.
    pub fn replace(&self, policy: SecurityPolicy) -> Arc<SecurityPolicy> {
        let next = Arc::new(policy);
        std::mem::replace(&mut *self.current.write(), next)
    }
}
