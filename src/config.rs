//! Injected bot configuration, constructed once and passed by reference
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Everything the ledger operations consume from the outside: limits, role
/// gates and the log channel. Built once at startup and handed into the
/// service; nothing here is a process-wide global.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub log_channel_id: String,
    pub sanction_roles: Vec<String>,
    pub annul_roles: Vec<String>,
    pub list_roles: Vec<String>,
    pub limits: Limits,
    /// Whether a failed save after a successful in-memory mutation is
    /// reported to the caller (`true`) or only logged (`false`).
    pub strict_persistence: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub warns: u32,
    /// Informational cap shown in progress labels; nothing enforces it.
    pub strikes: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self { warns: 3, strikes: 7 }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_channel_id: String::new(),
            sanction_roles: Vec::new(),
            annul_roles: Vec::new(),
            list_roles: Vec::new(),
            limits: Limits::default(),
            strict_persistence: false,
        }
    }
}

impl Config {
    /// Read a config file, falling back to defaults when it is missing or
    /// malformed so the bot still comes up.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "config malformed, using defaults");
                    Config::default()
                }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "config unreadable, using defaults");
                Config::default()
            }
        }
    }

    pub fn can_sanction(&self, member_roles: &[String]) -> bool {
        has_any_role(member_roles, &self.sanction_roles)
    }

    pub fn can_annul(&self, member_roles: &[String]) -> bool {
        has_any_role(member_roles, &self.annul_roles)
    }

    pub fn can_list(&self, member_roles: &[String]) -> bool {
        has_any_role(member_roles, &self.list_roles)
    }
}

// an empty gate lets everyone through, matching the unconfigured default
fn has_any_role(member_roles: &[String], gate: &[String]) -> bool {
    if gate.is_empty() {
        return true;
    }
    member_roles.iter().any(|r| gate.contains(r))
}
