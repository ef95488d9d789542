use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Local};
use reqwest::blocking::Client;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

use crate::case;
use crate::locales::{ErrorKey, Locale};
use crate::models::{Activity, ActivityParams, Project};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub enum ApiError {
    Unauthorized,
    Status { status: u16, message: String },
    Transport(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Invalid token. Please login."),
            ApiError::Status { message, .. } => write!(f, "{message}"),
            ApiError::Transport(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Body and query keys are camelCase here; the wrapper owns the wire
/// casing.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub path: String,
    pub data: Option<Value>,
    pub params: Option<Value>,
}

impl RequestConfig {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            data: None,
            params: None,
        }
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    locale: Locale,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>, locale: Locale) -> Self {
        let client = Client::builder()
            .user_agent("punchclock-tui")
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
            locale,
        }
    }

    pub fn working_activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.request(RequestConfig::new(Method::GET, "/v1/activities/working"))
    }

    pub fn activities(
        &self,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Vec<Activity>, ApiError> {
        let params = serde_json::json!({
            "startedAfter": start.to_rfc3339(),
            "startedBefore": end.to_rfc3339(),
        });
        self.request(RequestConfig::new(Method::GET, "/v1/activities").params(params))
    }

    pub fn add_activity(&self, params: &ActivityParams) -> Result<Activity, ApiError> {
        let data = serde_json::to_value(params)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.request(RequestConfig::new(Method::POST, "/v1/activities").data(data))
    }

    pub fn update_activity(&self, params: &ActivityParams) -> Result<Activity, ApiError> {
        let id = params
            .id
            .ok_or_else(|| ApiError::Transport("Activity update requires an id".to_string()))?;
        let data = serde_json::to_value(params)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.request(RequestConfig::new(Method::PUT, format!("/v1/activities/{id}")).data(data))
    }

    pub fn projects(&self) -> Result<Vec<Project>, ApiError> {
        self.request(RequestConfig::new(Method::GET, "/v1/projects"))
    }

    pub fn request<T: DeserializeOwned>(&self, config: RequestConfig) -> Result<T, ApiError> {
        let credentials = STANDARD.encode(format!("{}:api_token", self.token));
        let mut request = self
            .client
            .request(config.method, join_url(&self.base_url, &config.path))
            .header("Content-Type", "application/json")
            .header("Accept-Language", self.locale.tag())
            .header("Authorization", format!("Basic {credentials}"));

        if let Some(params) = config.params {
            request = request.query(&query_pairs(&case::snakecase_keys(params)));
        }
        if let Some(data) = config.data {
            request = request.json(&case::snakecase_keys(data));
        }

        let response = request.send().map_err(|err| self.transport_error(err))?;
        let status = response.status();

        if status == 401 || status == 403 {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .json::<Value>()
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("API error: {status}"));
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<Value>()
            .map_err(|err| self.transport_error(err))?;
        serde_json::from_value(case::camelcase_keys(body))
            .map_err(|err| ApiError::Transport(err.to_string()))
    }

    // Timeout, connect failure, and an aborted in-flight request get
    // localized text; everything else keeps the transport's message.
    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        let message = if err.is_timeout() {
            self.locale.error_message(ErrorKey::Timeout).to_string()
        } else if err.is_connect() {
            self.locale.error_message(ErrorKey::NetworkError).to_string()
        } else if err.is_request() {
            self.locale.error_message(ErrorKey::RequestAborted).to_string()
        } else {
            err.to_string()
        };
        ApiError::Transport(message)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(object) = params {
        for (key, value) in object {
            let rendered = match value {
                Value::Null => continue,
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            pairs.push((key.clone(), rendered));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("https://tracker.example.com/", "/v1/projects"),
            "https://tracker.example.com/v1/projects"
        );
        assert_eq!(
            join_url("http://localhost:3000", "/v1/activities/1"),
            "http://localhost:3000/v1/activities/1"
        );
    }

    #[test]
    fn query_pairs_render_scalars_and_skip_nulls() {
        let pairs = query_pairs(&json!({
            "started_after": "2026-02-03T00:00:00+00:00",
            "limit": 50,
            "working": true,
            "cursor": null
        }));
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("limit".to_string(), "50".to_string())));
        assert!(pairs.contains(&("working".to_string(), "true".to_string())));
    }

    #[test]
    fn outbound_payload_keys_are_snake_case() {
        let params = ActivityParams {
            id: Some(1),
            project_id: Some(Some(2)),
            description: Some("Review my tasks".to_string()),
            stopped_at: Some(Local.with_ymd_and_hms(2026, 2, 3, 10, 0, 0).unwrap()),
            ..Default::default()
        };
        let wire = case::snakecase_keys(serde_json::to_value(&params).unwrap());
        let object = wire.as_object().unwrap();
        assert!(object.contains_key("project_id"));
        assert!(object.contains_key("stopped_at"));
        assert!(!object.contains_key("projectId"));
        assert!(!object.contains_key("started_at"));
    }

    #[test]
    fn unauthorized_error_display_asks_for_login() {
        assert_eq!(
            ApiError::Unauthorized.to_string(),
            "Invalid token. Please login."
        );
    }

    #[test]
    fn status_error_display_uses_server_message() {
        let err = ApiError::Status {
            status: 422,
            message: "Description is too long".to_string(),
        };
        assert_eq!(err.to_string(), "Description is too long");
    }
}
