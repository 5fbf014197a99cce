//! reqwest-backed VRChat client. One request per call, no retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE, SET_COOKIE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{
    session_cookie_header, LoginOutcome, VrcApiError, VrcAuthApi, VrcCredentials, VrcProfile,
};

pub const DEFAULT_VRC_API_BASE: &str = "https://api.vrchat.cloud/api/1";
pub const DEFAULT_VRC_USER_AGENT: &str = "vrc-bind/0.1.0";

#[derive(Debug, Clone)]
/// Connection settings for `VrcApiClient`.
pub struct VrcApiConfig {
    pub api_base: String,
    pub user_agent: String,
    pub request_timeout_ms: u64,
}

impl Default for VrcApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_VRC_API_BASE.to_string(),
            user_agent: DEFAULT_VRC_USER_AGENT.to_string(),
            request_timeout_ms: 15_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VrcErrorEnvelope {
    error: Option<VrcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct VrcErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VrcLoginResponse {
    #[serde(default)]
    requires_two_factor_auth: Value,
}

#[derive(Debug, Clone)]
/// Public struct `VrcApiClient` talking to the VRChat HTTP API.
pub struct VrcApiClient {
    http: reqwest::Client,
    api_base: String,
}

impl VrcApiClient {
    pub fn new(config: VrcApiConfig) -> Result<Self, VrcApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(config.user_agent.trim()).map_err(|error| {
                VrcApiError::InvalidResponse(format!("invalid user agent header: {error}"))
            })?,
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, VrcApiError> {
        tracing::debug!(operation, "sending vrchat request");
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = parse_error_message(&body);
        tracing::warn!(
            operation,
            status = status.as_u16(),
            error_message = message.as_deref().unwrap_or(""),
            "vrchat request rejected"
        );
        Err(VrcApiError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode_json<T: DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> Result<T, VrcApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|error| {
        VrcApiError::InvalidResponse(format!("failed to decode vrchat {operation}: {error}"))
    })
}

fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<VrcErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
}

fn collect_set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn require_session_cookies(
    operation: &str,
    headers: &HeaderMap,
) -> Result<Vec<String>, VrcApiError> {
    let cookies = collect_set_cookies(headers);
    if cookies.is_empty() {
        return Err(VrcApiError::InvalidResponse(format!(
            "vrchat {operation} response did not include session cookies"
        )));
    }
    Ok(cookies)
}

/// The flag has been observed as a bool and as a list of allowed methods.
fn flag_is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[async_trait]
impl VrcAuthApi for VrcApiClient {
    async fn login(&self, credentials: &VrcCredentials) -> Result<LoginOutcome, VrcApiError> {
        let request = self
            .http
            .post(self.endpoint("auth/user"))
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&json!({}));
        let response = self.send("auth/user login", request).await?;
        let headers = response.headers().clone();
        let payload: VrcLoginResponse = decode_json("auth/user login", response).await?;

        if flag_is_set(&payload.requires_two_factor_auth) {
            return Ok(LoginOutcome::TwoFactorRequired);
        }
        let cookies = require_session_cookies("auth/user login", &headers)?;
        Ok(LoginOutcome::Authenticated { cookies })
    }

    async fn verify_two_factor(
        &self,
        credentials: &VrcCredentials,
        code: &str,
    ) -> Result<Vec<String>, VrcApiError> {
        let request = self
            .http
            .post(self.endpoint("auth/twofactor"))
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(&json!({ "code": code }));
        let response = self.send("auth/twofactor", request).await?;
        require_session_cookies("auth/twofactor", response.headers())
    }

    async fn current_user(&self, cookies: &[String]) -> Result<VrcProfile, VrcApiError> {
        let request = self
            .http
            .get(self.endpoint("auth/user"))
            .header(COOKIE, session_cookie_header(cookies));
        let response = self.send("auth/user profile", request).await?;
        decode_json("auth/user profile", response).await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};
    use serde_json::json;

    use super::{
        collect_set_cookies, flag_is_set, parse_error_message, VrcApiClient, VrcApiConfig,
    };

    #[test]
    fn unit_parse_error_message_reads_nested_error_message() {
        let body = r#"{"error":{"message":"Invalid Credentials","status_code":401}}"#;
        assert_eq!(
            parse_error_message(body),
            Some("Invalid Credentials".to_string())
        );
    }

    #[test]
    fn unit_parse_error_message_ignores_unstructured_bodies() {
        assert_eq!(parse_error_message("Bad Gateway"), None);
        assert_eq!(parse_error_message(r#"{"error":{}}"#), None);
        assert_eq!(parse_error_message(r#"{"error":{"message":""}}"#), None);
    }

    #[test]
    fn unit_flag_is_set_accepts_bool_and_method_lists() {
        assert!(flag_is_set(&json!(true)));
        assert!(flag_is_set(&json!(["totp", "otp"])));
        assert!(!flag_is_set(&json!(false)));
        assert!(!flag_is_set(&json!(null)));
    }

    #[test]
    fn unit_collect_set_cookies_reads_every_header_value() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("auth=a; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("twoFactorAuth=b; Path=/"));
        assert_eq!(
            collect_set_cookies(&headers),
            vec!["auth=a; Path=/".to_string(), "twoFactorAuth=b; Path=/".to_string()]
        );
    }

    #[test]
    fn unit_endpoint_joins_base_without_duplicate_slashes() {
        let client = VrcApiClient::new(VrcApiConfig {
            api_base: "http://127.0.0.1:9/api/1/".to_string(),
            ..VrcApiConfig::default()
        })
        .expect("client");
        assert_eq!(
            client.endpoint("/auth/user"),
            "http://127.0.0.1:9/api/1/auth/user"
        );
    }
}
