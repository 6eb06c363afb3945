// src/service_client.rs
//! HTTP client for the external analysis service - one method per endpoint

use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{error, info, trace};

use crate::error::{Result, WizardError};
use crate::types::response::{AnalyzeRequest, AnalyzeResponse, ErrorBody, GenerateRequest, UploadResponse};
use crate::types::{Artifact, DocumentFile, TemplateInfo};
use crate::utils::artifact_file_name;

const UPLOAD_CV_ENDPOINT: &str = "/api/upload-cv";
const ANALYZE_ENDPOINT: &str = "/api/analyze";
const GENERATE_RESUME_ENDPOINT: &str = "/api/generate-resume";
const TEMPLATES_ENDPOINT: &str = "/api/templates";
const HEALTH_ENDPOINT: &str = "/health";

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Create a new client for the service at `base_url`
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| WizardError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// 1. CV upload - sends the document as multipart, receives its id
    pub async fn upload_document(&self, document: &DocumentFile) -> Result<UploadResponse> {
        let url = format!("{}{}", self.base_url, UPLOAD_CV_ENDPOINT);

        let form = Form::new().part(
            "cv_file",
            Part::bytes(document.bytes.clone())
                .file_name(document.file_name.clone())
                .mime_str(&document.content_type)
                .map_err(|e| WizardError::Transport(format!("failed to create multipart: {e}")))?,
        );

        info!("Calling CV upload service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(request_failed)?;

        Self::parse_json(response).await
    }

    /// 2. Job analysis - sends document id + job description, receives the match analysis
    pub async fn analyze(&self, cv_id: &str, job_description: &str) -> Result<AnalyzeResponse> {
        let url = format!("{}{}", self.base_url, ANALYZE_ENDPOINT);

        let payload = AnalyzeRequest {
            cv_id: cv_id.to_string(),
            job_description: job_description.to_string(),
        };

        trace!("Calling job analysis service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(request_failed)?;

        Self::parse_json(response).await
    }

    /// 3. Resume generation - sends analysis id + confirmed skills (and the
    /// template id in the templated flow), receives the artifact bytes
    pub async fn generate_resume(
        &self,
        analysis_id: &str,
        confirmed_skills: &[String],
        template_id: Option<&str>,
    ) -> Result<Artifact> {
        let url = format!("{}{}", self.base_url, GENERATE_RESUME_ENDPOINT);

        let payload = GenerateRequest {
            analysis_id: analysis_id.to_string(),
            confirmed_skills: confirmed_skills.to_vec(),
            template_id: template_id.map(String::from),
        };

        trace!("Calling resume generation service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(request_failed)?;

        let response = Self::check_status(response).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| WizardError::Transport(format!("failed to read artifact body: {e}")))?;

        Ok(Artifact {
            file_name: artifact_file_name(&content_type).to_string(),
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    /// 4. Template catalog (templated flow only)
    pub async fn list_templates(&self) -> Result<Vec<TemplateInfo>> {
        let url = format!("{}{}", self.base_url, TEMPLATES_ENDPOINT);

        trace!("Fetching template catalog: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(request_failed)?;

        Self::parse_json(response).await
    }

    /// Service liveness probe
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}{}", self.base_url, HEALTH_ENDPOINT);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(request_failed)?;

        Self::check_status(response).await.map(|_| ())
    }

    /// Surface non-2xx responses as transport errors carrying the body's
    /// `message` (or `detail`) field when one is present.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message.or(b.detail))
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "no response body".to_string()
                } else {
                    body.clone()
                }
            });

        error!("Service error response ({}): {}", status, message);
        Err(WizardError::Transport(format!(
            "service returned status {status}: {message}"
        )))
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| WizardError::Transport(format!("failed to read response body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| {
            WizardError::Transport(format!("failed to parse service response: {e}. Raw body: {body}"))
        })
    }
}

fn request_failed(err: reqwest::Error) -> WizardError {
    WizardError::Transport(format!("request failed: {err}"))
}
