//! Changelog payloads returned with `expand=changelog`.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<ChangelogHistory>,
}

/// One recorded edit of an issue: a timestamp plus the fields it changed.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogHistory {
    pub id: Option<String>,
    pub created: String,
    #[serde(default)]
    pub items: Vec<ChangelogItem>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogItem {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, rename = "fromString")]
    pub from_value: Option<String>,
    #[serde(default, rename = "toString")]
    pub to_value: Option<String>,
}

impl ChangelogHistory {
    /// Target status of this history entry, if it changed the status field.
    pub fn status_change(&self) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.field.as_deref() == Some("status"))
            .and_then(|item| item.to_value.as_deref())
    }
}
