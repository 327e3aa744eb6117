use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Identity binding established at login and persisted verbatim across
/// restarts. There is no expiry; a stored session is trusted until logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pppk_name: Option<String>,
}

impl Session {
    #[must_use]
    pub const fn new(role: Role, pppk_name: Option<String>) -> Self {
        Self { role, pppk_name }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.pppk_name.as_deref()
    }
}
