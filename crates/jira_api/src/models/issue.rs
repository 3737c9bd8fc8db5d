use serde::Deserialize;

use super::{Changelog, UserRef};

/// Envelope of `GET /search`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub start_at: Option<u64>,
    #[serde(default)]
    pub max_results: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub fields: IssueFields,
    #[serde(default)]
    pub changelog: Option<Changelog>,
}

/// Subset of issue `fields` the reports request. Every field is optional because
/// each query asks for a different field list.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct IssueFields {
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub resolutiondate: Option<String>,
    #[serde(default)]
    pub priority: Option<NamedField>,
    #[serde(default)]
    pub assignee: Option<UserRef>,
    #[serde(default)]
    pub reporter: Option<UserRef>,
    #[serde(default)]
    pub timespent: Option<u64>,
}

/// Represents `{ "id": ..., "name": ... }` shaped fields such as priority.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NamedField {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedField {
    pub fn name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl Issue {
    /// Key when present, falling back to the numeric id.
    pub fn label(&self) -> &str {
        self.key
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("<unknown>")
    }
}
