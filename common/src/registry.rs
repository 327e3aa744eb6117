use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Identity -> secret tables for both roles. The registry is injected as
/// configuration data; nothing in the core carries a baked-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRegistry {
    #[serde(default)]
    pub users: HashMap<String, String>,
    #[serde(default)]
    pub admins: HashMap<String, String>,
}

impl CredentialRegistry {
    #[must_use]
    pub const fn partition(&self, role: Role) -> &HashMap<String, String> {
        match role {
            Role::User => &self.users,
            Role::Admin => &self.admins,
        }
    }

    /// Exact string match against the partition selected by `role`.
    #[must_use]
    pub fn verify(&self, role: Role, name: &str, secret: &str) -> bool {
        self.partition(role).get(name).is_some_and(|s| s == secret)
    }

    #[must_use]
    pub fn names(&self, role: Role) -> Vec<&str> {
        let mut names: Vec<&str> = self.partition(role).keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
