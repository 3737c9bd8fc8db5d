//! User references embedded in issue fields.

use serde::Deserialize;

/// Represents an assignee/reporter reference as returned inside issue `fields`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub account_id: Option<String>,
    pub email_address: Option<String>,
}

impl UserRef {
    /// Display name trimmed, or `None` when absent or blank.
    pub fn display(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
