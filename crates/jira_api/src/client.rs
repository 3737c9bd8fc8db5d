use crate::config::{Credentials, JiraConfig};
use crate::error::{JiraError, Result};
use crate::models::SearchResponse;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One bounded query against the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub jql: String,
    pub fields: Vec<String>,
    pub expand: Option<String>,
}

impl SearchRequest {
    pub fn new(jql: impl Into<String>) -> Self {
        Self {
            jql: jql.into(),
            fields: Vec::new(),
            expand: None,
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_changelog(mut self) -> Self {
        self.expand = Some("changelog".to_string());
        self
    }

    fn query_params(&self, max_results: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![("jql", self.jql.clone())];
        if !self.fields.is_empty() {
            params.push(("fields", self.fields.join(",")));
        }
        params.push(("maxResults", max_results.to_string()));
        if let Some(expand) = &self.expand {
            params.push(("expand", expand.clone()));
        }
        params
    }
}

#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    /// Runs a single search request capped at `maxResults`. No paging follows.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let params = request.query_params(self.config.max_results);
        tracing::debug!(
            jql = %request.jql,
            fields = %request.fields.join(","),
            "jira:search start"
        );
        let response: SearchResponse = self
            .get_with_query(&self.config.search_url(), &params)
            .await?;
        tracing::debug!(
            returned = response.issues.len(),
            total = response.total.unwrap_or_default(),
            "jira:search result"
        );
        Ok(response)
    }

    pub async fn get_with_query<T>(&self, url: &str, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.authorize(self.http.get(url).query(query));
        let response = request.send().await?;
        Self::parse_json(response).await
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.credentials {
            Some(Credentials::Basic { user, token }) => request.basic_auth(user, Some(token)),
            _ => request,
        }
    }

    async fn parse_json<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(JiraError::from)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(JiraError::Authentication(format!(
                "Access denied ({}) - {}",
                status,
                extract_error_message(&body)
            )))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(JiraError::http(status, extract_error_message(&body)))
        }
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    if let Some(Credentials::Bearer(token)) = &config.credentials {
        let mut value = header_value(format!("Bearer {token}"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| JiraError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| JiraError::Other(err.to_string()))
}

/// Jira reports failures as `{"errorMessages": [...], "errors": {...}}`.
fn extract_error_message(body: &str) -> String {
    let messages = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        let list: Vec<String> = value
            .get("errorMessages")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if list.is_empty() {
            None
        } else {
            Some(list.join("; "))
        }
    });
    messages.unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::time::Duration;

    fn config_for(server: &mockito::Server) -> JiraConfig {
        JiraConfig::new()
            .with_base_url(server.url())
            .with_timeout(Duration::from_secs(5))
    }

    #[test]
    fn query_params_include_cap_and_expand() {
        let request = SearchRequest::new("project=KAFKA AND status=Closed")
            .with_fields(["created", "resolutiondate"])
            .with_changelog();
        let params = request.query_params(1000);
        assert_eq!(
            params,
            vec![
                ("jql", "project=KAFKA AND status=Closed".to_string()),
                ("fields", "created,resolutiondate".to_string()),
                ("maxResults", "1000".to_string()),
                ("expand", "changelog".to_string()),
            ]
        );
    }

    #[test]
    fn extract_error_message_joins_jira_messages() {
        let body = r#"{"errorMessages":["The value 'NOPE' does not exist for the field 'project'."],"errors":{}}"#;
        assert_eq!(
            extract_error_message(body),
            "The value 'NOPE' does not exist for the field 'project'."
        );
        assert_eq!(extract_error_message("  plain text "), "plain text");
    }

    #[tokio::test]
    async fn search_sends_bounded_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("jql".into(), "project=KAFKA AND status=Closed".into()),
                Matcher::UrlEncoded("fields".into(), "priority".into()),
                Matcher::UrlEncoded("maxResults".into(), "1000".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"startAt":0,"maxResults":1000,"total":2,"issues":[
                    {"id":"1","key":"KAFKA-1","fields":{"priority":{"name":"Major"}}},
                    {"id":"2","key":"KAFKA-2","fields":{"priority":null}}
                ]}"#,
            )
            .create_async()
            .await;

        let client = JiraClient::new(config_for(&server)).unwrap();
        let request =
            SearchRequest::new("project=KAFKA AND status=Closed").with_fields(["priority"]);
        let response = client.search(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.issues.len(), 2);
        assert_eq!(response.issues[0].label(), "KAFKA-1");
        assert!(response.issues[1].fields.priority.is_none());
    }

    #[tokio::test]
    async fn bearer_token_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body(r#"{"issues":[]}"#)
            .create_async()
            .await;

        let client =
            JiraClient::new(config_for(&server).with_bearer_token("secret-token")).unwrap();
        let response = client.search(&SearchRequest::new("project=X")).await.unwrap();

        mock.assert_async().await;
        assert!(response.issues.is_empty());
    }

    #[tokio::test]
    async fn basic_auth_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Regex("^Basic ".into()))
            .with_status(200)
            .with_body(r#"{"issues":[]}"#)
            .create_async()
            .await;

        let client =
            JiraClient::new(config_for(&server).with_basic_auth("analyst", "api-token")).unwrap();
        client.search(&SearchRequest::new("project=X")).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn bad_request_maps_to_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"errorMessages":["Field 'foo' does not exist."],"errors":{}}"#)
            .create_async()
            .await;

        let client = JiraClient::new(config_for(&server)).unwrap();
        let err = client
            .search(&SearchRequest::new("foo=bar"))
            .await
            .unwrap_err();

        match err {
            JiraError::Http { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Field 'foo' does not exist.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn forbidden_maps_to_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("nope")
            .create_async()
            .await;

        let client = JiraClient::new(config_for(&server)).unwrap();
        let err = client
            .search(&SearchRequest::new("project=X"))
            .await
            .unwrap_err();

        assert!(matches!(err, JiraError::Authentication(_)));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_serialization_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/api/2/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = JiraClient::new(config_for(&server)).unwrap();
        let err = client
            .search(&SearchRequest::new("project=X"))
            .await
            .unwrap_err();

        assert!(matches!(err, JiraError::Serialization(_)));
    }
}
