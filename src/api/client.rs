use super::models::{
    ApiResponse, HealthStatus, Highlight, Meeting, MeetingList, MeetingsParams, Sentence,
};
use super::retry::RetryPolicy;
use super::validation::Validate;
use crate::error::{Result, TldvError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

pub const DEFAULT_BASE_URL: &str = "https://pasta.tldv.io/v1alpha1";
pub const API_KEY_ENV: &str = "TLDV_API_KEY";
const API_KEY_HEADER: &str = "x-api-key";

/// Settings needed to talk to the tl;dv API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            retry: RetryPolicy::default(),
        }
    }
}

/// Typed client for the tl;dv meetings API.
///
/// Every operation resolves to an [`ApiResponse`]; failures never escape as
/// `Err` or panics.
#[derive(Clone)]
pub struct TldvClient {
    http: Client,
    api_key: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl TldvClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TldvError::Config("API key is required".to_string()));
        }

        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| TldvError::Config(format!("Invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TldvError::Config(format!(
                "Invalid base URL '{}': cannot hold a path",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| TldvError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url,
            retry: config.retry,
        })
    }

    /// Build a client from the `TLDV_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            TldvError::Config(format!("{} environment variable is not set", API_KEY_ENV))
        })?;
        Self::new(ApiConfig::new(api_key))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append `segments` to the base path, percent-encoding each one
    fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get_meeting(&self, meeting_id: &str) -> ApiResponse<Meeting> {
        self.get(&["meetings", meeting_id], &[]).await
    }

    pub async fn get_meetings(&self, params: &MeetingsParams) -> ApiResponse<MeetingList> {
        let query = match params.validate() {
            Ok(query) => query,
            Err(violations) => {
                warn!("Rejected meeting list parameters: {}", violations);
                return ApiResponse::failure(TldvError::Validation(violations));
            }
        };

        self.get(&["meetings"], &query.to_query_pairs()).await
    }

    pub async fn get_transcript(&self, meeting_id: &str) -> ApiResponse<Vec<Sentence>> {
        self.get(&["meetings", meeting_id, "transcript"], &[])
            .await
    }

    pub async fn get_highlights(&self, meeting_id: &str) -> ApiResponse<Vec<Highlight>> {
        self.get(&["meetings", meeting_id, "highlights"], &[])
            .await
    }

    pub async fn health_check(&self) -> ApiResponse<HealthStatus> {
        self.get(&["health"], &[]).await
    }

    /// Run a GET with the retry policy, folding every outcome into an envelope
    async fn get<T>(&self, segments: &[&str], query: &[(&'static str, String)]) -> ApiResponse<T>
    where
        T: DeserializeOwned + Validate,
    {
        let url = self.endpoint_url(segments);
        let endpoint = url.path();
        let mut attempt = 0;
        loop {
            match self.execute(&url, query).await {
                Ok(response) => return response,
                Err(e) if self.retry.should_retry(attempt, &e) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "Request to {} failed ({}), retry {}/{} in {:?}",
                        endpoint,
                        e,
                        attempt + 1,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        "Request to {} failed after {} retries: {}",
                        endpoint, attempt, e
                    );
                    return ApiResponse::failure(e);
                }
            }
        }
    }

    async fn execute<T>(&self, url: &Url, query: &[(&'static str, String)]) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned + Validate,
    {
        debug!("GET {} {:?}", url, query);

        let mut request = self
            .http
            .get(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = parse_body(&bytes);

        if status > 200 {
            return Err(TldvError::Http {
                status,
                message: error_message(&body, status),
            });
        }

        decode_envelope(body)
    }
}

/// JSON when possible, otherwise the raw text as a string value
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn error_message(body: &Value, status: u16) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("Request failed with status code {}", status))
}

/// Bodies that already carry `data` are the envelope; anything else is the payload.
fn decode_envelope<T>(body: Value) -> Result<ApiResponse<T>>
where
    T: DeserializeOwned + Validate,
{
    let envelope = match body {
        Value::Object(map) if map.contains_key("data") => Value::Object(map),
        other => serde_json::json!({ "data": other }),
    };

    let response: ApiResponse<T> =
        serde_json::from_value(envelope).map_err(|e| TldvError::Decode(e.to_string()))?;

    match (&response.data, &response.error) {
        (Some(data), _) => data.validate()?,
        (None, None) => return Err(TldvError::Decode("response has no data".to_string())),
        (None, Some(_)) => {}
    }

    Ok(response)
}
