use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://issues.apache.org/jira";
pub const DEFAULT_API_VERSION: &str = "2";
pub const DEFAULT_USER_AGENT: &str = "jira-reports";
pub const DEFAULT_MAX_RESULTS: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Credentials attached to every request. Public instances need none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Basic { user: String, token: String },
}

#[derive(Clone, Debug)]
pub struct JiraConfig {
    pub base_url: String,
    pub api_version: String,
    pub credentials: Option<Credentials>,
    pub user_agent: String,
    pub max_results: u32,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl JiraConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            credentials: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Bearer(token.into()));
        self
    }

    pub fn with_basic_auth(mut self, user: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::Basic {
            user: user.into(),
            token: token.into(),
        });
        self
    }

    /// Result cap sent as `maxResults`. Zero falls back to the default cap.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = if max_results == 0 {
            DEFAULT_MAX_RESULTS
        } else {
            max_results
        };
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    pub fn api_root(&self) -> String {
        format!(
            "{}/rest/api/{}/",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    pub fn search_url(&self) -> String {
        format!("{}search", self.api_root())
    }
}
