//! Typed Jira search API client crate used by the reporting tool.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::{JiraClient, SearchRequest};
pub use config::{Credentials, JiraConfig};
pub use error::{JiraError, Result};
pub use models::{
    Changelog, ChangelogHistory, ChangelogItem, Issue, IssueFields, NamedField, SearchResponse,
    UserRef,
};
