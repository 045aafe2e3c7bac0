//! Client layer: orchestrates transport calls, retries, and maps transport ↔ domain.

mod retry;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{GatewayUrl, SendSms, SendSmsResponse, TimestampMillis, ValidationError};

pub use retry::{
    BACKOFF_MAX, DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, RETRY_STATUSES, RetryPolicy,
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest response body quoted in an error message.
const ERROR_BODY_PREVIEW: usize = 256;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
    retry_after: Option<Duration>,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: &'a Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self.client.post(url).json(body).send().await?;
            let status = response.status().as_u16();
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(retry::parse_retry_after);
            let body = response.text().await?;
            Ok(HttpResponse {
                status,
                body,
                retry_after,
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsGatewayClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - validation/parse failures.
pub enum SmsGatewayError {
    /// HTTP client / transport failure (DNS, TLS, connection refused, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the gateway.
    ///
    /// For retryable statuses this is the last response after the retry budget ran out.
    #[error("unexpected HTTP status: {status}{}", body_preview(.body))]
    HttpStatus { status: u16, body: Option<String> },

    /// Request envelope could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] Box<dyn StdError + Send + Sync>),

    /// Response body could not be parsed as JSON.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn body_preview(body: &Option<String>) -> String {
    match body {
        Some(body) if body.chars().count() > ERROR_BODY_PREVIEW => {
            let head = body.chars().take(ERROR_BODY_PREVIEW).collect::<String>();
            format!(": {head}…")
        }
        Some(body) => format!(": {body}"),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmsGatewayClient`].
///
/// Use this when you need to customize the timeout, retry policy, or user-agent.
pub struct SmsGatewayClientBuilder {
    gateway: GatewayUrl,
    timeout: Duration,
    max_retries: u32,
    backoff_factor: f64,
    user_agent: Option<String>,
}

impl SmsGatewayClientBuilder {
    /// Create a builder with a 5s timeout, 10 retries and a 0.3 backoff factor.
    pub fn new(gateway: GatewayUrl) -> Self {
        Self {
            gateway,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            user_agent: None,
        }
    }

    /// Set the HTTP timeout applied to each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of retries after the first attempt (`0` disables retrying).
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exponential backoff factor in seconds.
    pub fn backoff_factor(mut self, backoff_factor: f64) -> Self {
        self.backoff_factor = backoff_factor;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`SmsGatewayClient`].
    pub fn build(self) -> Result<SmsGatewayClient, SmsGatewayError> {
        let retry = RetryPolicy::new(self.max_retries, self.backoff_factor)?;

        let mut builder = reqwest::Client::builder().timeout(self.timeout);
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SmsGatewayError::Transport(Box::new(err)))?;

        Ok(SmsGatewayClient {
            send_endpoint: self.gateway.send_endpoint(),
            timeout: self.timeout,
            retry,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// Client for an SMS gateway exposing `POST /sms/send`.
///
/// Each call stamps a fresh millisecond timestamp, posts the JSON envelope and returns the
/// decoded response body untouched. Transient failures (HTTP 500/502/503/504, connection
/// errors, timeouts) are retried according to the configured [`RetryPolicy`]; other non-2xx
/// statuses fail immediately.
pub struct SmsGatewayClient {
    send_endpoint: String,
    timeout: Duration,
    retry: RetryPolicy,
    http: Arc<dyn HttpTransport>,
}

impl SmsGatewayClient {
    /// Create a client with default settings for a `host:port` or `http(s)://` server address.
    ///
    /// For more customization, use [`SmsGatewayClient::builder`].
    pub fn new(server: impl Into<String>) -> Result<Self, SmsGatewayError> {
        Self::builder(GatewayUrl::parse(server)?).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(gateway: GatewayUrl) -> SmsGatewayClientBuilder {
        SmsGatewayClientBuilder::new(gateway)
    }

    /// Full URL requests are posted to.
    pub fn send_endpoint(&self) -> &str {
        &self.send_endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send an SMS through the gateway.
    ///
    /// Errors:
    /// - [`SmsGatewayError::Transport`] when every attempt failed below HTTP,
    /// - [`SmsGatewayError::HttpStatus`] for 4xx responses and for 5xx after retries ran out,
    /// - [`SmsGatewayError::Parse`] when the 2xx body is not JSON.
    pub async fn send_sms(&self, request: SendSms) -> Result<SendSmsResponse, SmsGatewayError> {
        let body = crate::transport::encode_send_sms_envelope(&request, TimestampMillis::now())
            .map_err(|err| SmsGatewayError::Encode(Box::new(err)))?;

        let response = self.post_with_retry(&body).await?;

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(SmsGatewayError::HttpStatus {
                status: response.status,
                body,
            });
        }

        let parsed = crate::transport::decode_send_sms_json_response(&response.body)
            .map_err(|err| SmsGatewayError::Parse(Box::new(err)))?;

        info!(status = response.status, "gateway accepted SMS");
        Ok(parsed)
    }

    async fn post_with_retry(&self, body: &Value) -> Result<HttpResponse, SmsGatewayError> {
        let mut failures = 0u32;
        loop {
            debug!(
                endpoint = %self.send_endpoint,
                attempt = failures + 1,
                "posting SMS envelope"
            );

            let delay = match self.http.post_json(&self.send_endpoint, body).await {
                Ok(response)
                    if self.retry.is_retryable_status(response.status)
                        && self.retry.can_retry(failures) =>
                {
                    failures += 1;
                    let delay = self.retry.delay_after_status(
                        failures,
                        response.status,
                        response.retry_after,
                    );
                    warn!(
                        status = response.status,
                        retry = failures,
                        delay_ms = delay.as_millis() as u64,
                        "gateway returned a retryable status"
                    );
                    delay
                }
                Ok(response) => return Ok(response),
                Err(err) if self.retry.can_retry(failures) => {
                    failures += 1;
                    let delay = self.retry.backoff(failures);
                    warn!(
                        error = %err,
                        retry = failures,
                        delay_ms = delay.as_millis() as u64,
                        "request to gateway failed"
                    );
                    delay
                }
                Err(err) => return Err(SmsGatewayError::Transport(err)),
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}
