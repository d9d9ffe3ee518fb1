use serde::Serialize;
use std::collections::BTreeMap;

use crate::code::{format_code, SuffixSource};

pub const INTERN: &str = "Intern";
pub const EMPLOYEE: &str = "Employee";
pub const INTERN_PREFIX: &str = "nxrint";
pub const EMPLOYEE_PREFIX: &str = "nxremp";

/// Role name to code prefix mapping.
///
/// Lookups are exact and case-sensitive: `"intern"` is not `"Intern"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleTable {
    #[serde(rename = "roles")]
    prefixes: BTreeMap<String, String>,
    fallback: String,
}

impl Default for RoleTable {
    fn default() -> Self {
        let prefixes = [(INTERN, INTERN_PREFIX), (EMPLOYEE, EMPLOYEE_PREFIX)]
            .into_iter()
            .map(|(r, p)| (r.to_string(), p.to_string()))
            .collect();
        RoleTable {
            prefixes,
            fallback: EMPLOYEE_PREFIX.to_string(),
        }
    }
}

impl RoleTable {
    /// Build a table from already-validated parts. See `Config::into_table`.
    pub fn new(prefixes: BTreeMap<String, String>, fallback: String) -> Self {
        RoleTable { prefixes, fallback }
    }

    pub fn prefix_for(&self, role: &str) -> Option<&str> {
        self.prefixes.get(role).map(String::as_str)
    }

    pub fn is_recognized(&self, role: &str) -> bool {
        self.prefixes.contains_key(role)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Role owning `prefix`. When several roles share a prefix the first in
    /// name order wins.
    pub fn role_for_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|(_, p)| p.as_str() == prefix)
            .map(|(r, _)| r.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(r, p)| (r.as_str(), p.as_str()))
    }

    /// Build a fresh code for `role`. Unknown roles get the fallback prefix;
    /// callers that must clear instead check `is_recognized` first.
    pub fn generate(&self, role: &str, source: &mut impl SuffixSource) -> String {
        let prefix = self.prefix_for(role).unwrap_or(&self.fallback);
        format_code(prefix, source.draw())
    }
}
