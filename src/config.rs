use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::code::is_valid_prefix;
use crate::roles::{RoleTable, EMPLOYEE, EMPLOYEE_PREFIX, INTERN, INTERN_PREFIX};

/// Role table as stored on disk:
///
/// ```json
/// { "roles": { "Intern": "nxrint", "Employee": "nxremp" }, "fallback": "nxremp" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub roles: BTreeMap<String, String>,
    pub fallback: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            roles: BTreeMap::from([
                (INTERN.to_string(), INTERN_PREFIX.to_string()),
                (EMPLOYEE.to_string(), EMPLOYEE_PREFIX.to_string()),
            ]),
            fallback: EMPLOYEE_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Defaults when no path is given, otherwise the file at `path`.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), roles = config.roles.len(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (role, prefix) in &self.roles {
            if role.trim().is_empty() {
                bail!("role names must not be empty");
            }
            if !is_valid_prefix(prefix) {
                bail!("prefix '{prefix}' for role '{role}' must be lowercase ascii letters");
            }
        }
        if !is_valid_prefix(&self.fallback) {
            bail!(
                "fallback prefix '{}' must be lowercase ascii letters",
                self.fallback
            );
        }
        Ok(())
    }

    pub fn into_table(self) -> RoleTable {
        RoleTable::new(self.roles, self.fallback)
    }
}
