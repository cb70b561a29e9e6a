use std::time::Duration;

use futures_util::StreamExt;
use guard_logging::{guard_debug, guard_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{FailureKind, ServiceError};

pub const SCRAPE_PATH: &str = "scrape";
pub const PREDICT_PATH: &str = "predict";

/// Longest error body kept in a `ServiceError` message.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Base address of the detection server, e.g. `http://localhost:8000`.
    pub server_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl ClientSettings {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    probability: f64,
}

/// The two calls the front-end makes against the detection server.
#[async_trait::async_trait]
pub trait DetectorClient: Send + Sync {
    /// `POST /scrape {url}` → article text. A missing `text` field yields "".
    async fn scrape(&self, url: &str) -> Result<String, ServiceError>;

    /// `POST /predict {text}` → probability in 0..=1.
    async fn predict(&self, text: &str) -> Result<f64, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestDetectorClient {
    client: reqwest::Client,
    scrape_url: Url,
    predict_url: Url,
    max_bytes: u64,
}

impl ReqwestDetectorClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let scrape_url = endpoint(&settings.server_url, SCRAPE_PATH)?;
        let predict_url = endpoint(&settings.server_url, PREDICT_PATH)?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            scrape_url,
            predict_url,
            max_bytes: settings.max_bytes,
        })
    }

    pub fn scrape_url(&self) -> &Url {
        &self.scrape_url
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }

    async fn post_json<B, R>(&self, url: &Url, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body)
            .map_err(|err| ServiceError::new(FailureKind::MalformedResponse, err.to_string()))?;

        guard_debug!("POST {} ({} byte body)", url, payload.len());
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if let Some(content_len) = response.content_length() {
            if content_len > self.max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let bytes = self.read_body(response).await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            let message = truncate_chars(body.trim(), MAX_ERROR_BODY);
            guard_warn!("POST {} failed with {}: {}", url, status, message);
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                if message.is_empty() {
                    status.to_string()
                } else {
                    message
                },
            ));
        }

        serde_json::from_slice(&bytes)
            .map_err(|err| ServiceError::new(FailureKind::MalformedResponse, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, ServiceError> {
        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl DetectorClient for ReqwestDetectorClient {
    async fn scrape(&self, url: &str) -> Result<String, ServiceError> {
        let response: ScrapeResponse = self
            .post_json(&self.scrape_url, &ScrapeRequest { url })
            .await?;
        let text = response.text.unwrap_or_default();
        guard_debug!("scrape returned {} chars", text.chars().count());
        Ok(text)
    }

    async fn predict(&self, text: &str) -> Result<f64, ServiceError> {
        let response: PredictResponse = self
            .post_json(&self.predict_url, &PredictRequest { text })
            .await?;
        let probability = response.probability;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ServiceError::new(
                FailureKind::ProbabilityOutOfRange,
                format!("probability {probability} outside 0..=1"),
            ));
        }
        guard_debug!("predict returned probability {probability:.4}");
        Ok(probability)
    }
}

/// Joins `path` onto the server base the way a string template would, so a
/// base with a path prefix keeps it.
fn endpoint(server_url: &str, path: &str) -> Result<Url, ServiceError> {
    let base = server_url.trim().trim_end_matches('/');
    let url = Url::parse(&format!("{base}/{path}"))
        .map_err(|err| ServiceError::new(FailureKind::InvalidServerUrl, err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ServiceError::new(
            FailureKind::InvalidServerUrl,
            format!("unsupported scheme `{other}`"),
        )),
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &input[..idx]),
        None => input.to_string(),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ServiceError::new(FailureKind::MalformedResponse, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
