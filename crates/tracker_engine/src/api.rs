use std::time::Duration;

use serde::{Deserialize, Serialize};

use tracker_core::{BatchParameters, BatchState, BatchStatus, JobHandle};

use crate::types::{ApiError, ApiFailure, PendingCount};

/// Connection settings for the job API client.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Bound on each individual request; a timed-out poll counts as one
    /// failed poll, never as a terminal job state.
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// Client-side view of the external job API.
#[async_trait::async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Issues exactly one create request; never retries on its own.
    async fn submit_batch(&self, params: &BatchParameters) -> Result<JobHandle, ApiError>;
    async fn batch_status(&self, handle: &JobHandle) -> Result<BatchStatus, ApiError>;
    async fn pending_count(&self, limit: u32) -> Result<PendingCount, ApiError>;
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    batch_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    similarity_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domains: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    batch_id: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    progress_percent: f64,
    #[serde(default)]
    processed_domains: u32,
    #[serde(default)]
    total_domains: u32,
    similar_companies_found: Option<u32>,
    errors: Option<u32>,
}

#[derive(Deserialize)]
struct PendingResponse {
    total: u32,
    #[serde(default)]
    pending_domains: Vec<String>,
}

/// Reqwest-backed implementation of [`ConsoleApi`].
#[derive(Debug, Clone)]
pub struct HttpConsoleApi {
    client: reqwest::Client,
    base: url::Url,
}

impl HttpConsoleApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        // A trailing slash keeps Url::join appending instead of replacing
        // the last path segment.
        let mut raw = settings.base_url;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = url::Url::parse(&raw)
            .map_err(|err| ApiError::new(ApiFailure::InvalidBaseUrl, err.to_string()))?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::new(ApiFailure::InvalidBaseUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn submit_batch(&self, params: &BatchParameters) -> Result<JobHandle, ApiError> {
        let body = SubmitRequest {
            batch_size: params.batch_size,
            similarity_weight: params.similarity_weight,
            country_code: params.country_code.as_deref(),
            domains: params.domains.as_deref(),
        };

        let response = self
            .client
            .post(self.endpoint("batch")?)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|err| ApiError::new(ApiFailure::MalformedResponse, err.to_string()))?;

        match parsed.batch_id {
            Some(id) => Ok(JobHandle::new(id)),
            None => Err(ApiError::new(
                ApiFailure::Rejected,
                parsed
                    .error
                    .unwrap_or_else(|| "response carried no batch_id".to_string()),
            )),
        }
    }

    async fn batch_status(&self, handle: &JobHandle) -> Result<BatchStatus, ApiError> {
        let endpoint = self.endpoint(&format!("batch/{}/status", handle.as_str()))?;
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let parsed: StatusResponse = response
            .json()
            .await
            .map_err(|err| ApiError::new(ApiFailure::MalformedResponse, err.to_string()))?;

        let state = BatchState::parse(&parsed.status).ok_or_else(|| {
            ApiError::new(
                ApiFailure::MalformedResponse,
                format!("unknown status {:?}", parsed.status),
            )
        })?;

        Ok(BatchStatus {
            state,
            progress_percent: parsed.progress_percent,
            processed: parsed.processed_domains,
            total: parsed.total_domains,
            found: parsed.similar_companies_found,
            errors: parsed.errors,
        })
    }

    async fn pending_count(&self, limit: u32) -> Result<PendingCount, ApiError> {
        let mut endpoint = self.endpoint("pending")?;
        endpoint
            .query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let parsed: PendingResponse = response
            .json()
            .await
            .map_err(|err| ApiError::new(ApiFailure::MalformedResponse, err.to_string()))?;

        Ok(PendingCount {
            total: parsed.total,
            preview: parsed.pending_domains,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailure::Timeout, err.to_string());
    }
    ApiError::new(ApiFailure::Network, err.to_string())
}
