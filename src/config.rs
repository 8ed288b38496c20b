use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::eval::{AccessLevel, SecurityPolicy};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicySettings,
    #[serde(default)]
    pub kubectl: VerbConfig,
    #[serde(default)]
    pub az: VerbConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PolicySettings {
    #[serde(default)]
    pub access_level: AccessLevel,
    /// Comma-separated namespace allow-list; empty means unrestricted.
    #[serde(default)]
    pub allowed_namespaces: String,
}

/// Verb phrases per category for one dialect.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct VerbConfig {
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
    #[serde(default)]
    pub admin: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    policy: PolicyOverlay,
    #[serde(default)]
    kubectl: VerbOverlay,
    #[serde(default)]
    az: VerbOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct PolicyOverlay {
    access_level: Option<AccessLevel>,
    allowed_namespaces: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct VerbOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    read: Vec<String>,
    #[serde(default)]
    write: Vec<String>,
    #[serde(default)]
    admin: Vec<String>,
    #[serde(default)]
    remove_read: Vec<String>,
    #[serde(default)]
    remove_write: Vec<String>,
    #[serde(default)]
    remove_admin: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

fn merge_verbs(base: &mut VerbConfig, overlay: VerbOverlay) {
    merge_list(&mut base.read, overlay.read, &overlay.remove_read, overlay.replace);
    merge_list(&mut base.write, overlay.write, &overlay.remove_write, overlay.replace);
    merge_list(&mut base.admin, overlay.admin, &overlay.remove_admin, overlay.replace);
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge the user overlay from `path`, or from
    ///    ~/.config/kubegate/config.toml when no path is given (if it exists)
    ///
    /// An explicit path must exist. A malformed overlay is an error rather
    /// than silently falling back to defaults, since it may narrow the policy.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay(path)? {
            config.apply_overlay(overlay);
        }
        Ok(config)
    }

    fn default_overlay_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config/kubegate/config.toml"))
    }

    fn load_overlay(path: Option<&str>) -> Result<Option<ConfigOverlay>, ConfigError> {
        let (path, required) = match path {
            Some(p) => (PathBuf::from(shellexpand::tilde(p).into_owned()), true),
            None => match Self::default_overlay_path() {
                Some(p) => (p, false),
                None => return Ok(None),
            },
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        log::debug!("loaded config overlay from {}", path.display());
        Ok(Some(toml::from_str(&content)?))
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Policy: scalar overrides
        if let Some(v) = overlay.policy.access_level {
            self.policy.access_level = v;
        }
        if let Some(v) = overlay.policy.allowed_namespaces {
            self.policy.allowed_namespaces = v;
        }

        merge_verbs(&mut self.kubectl, overlay.kubectl);
        merge_verbs(&mut self.az, overlay.az);
    }

    /// Apply process-level overrides (CLI flags / environment).
    pub fn apply_overrides(
        &mut self,
        access_level: Option<AccessLevel>,
        allowed_namespaces: Option<String>,
    ) {
        if let Some(v) = access_level {
            self.policy.access_level = v;
        }
        if let Some(v) = allowed_namespaces {
            self.policy.allowed_namespaces = v;
        }
    }

    /// The policy described by the `[policy]` section.
    pub fn security_policy(&self) -> SecurityPolicy {
        SecurityPolicy::from_parts(self.policy.access_level, &self.policy.allowed_namespaces)
    }

    /// Render the merged configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
