mod changelog;
mod issue;
mod user;

pub use changelog::{Changelog, ChangelogHistory, ChangelogItem};
pub use issue::{Issue, IssueFields, NamedField, SearchResponse};
pub use user::UserRef;
