// src/types/response.rs
//! Wire types for the analysis service endpoints

use serde::{Deserialize, Serialize};

// ===== Service Request Types =====

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub cv_id: String,
    pub job_description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub analysis_id: String,
    pub confirmed_skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

// ===== Service Response Types =====

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub cv_id: String,
    pub filename: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis_id: String,
    pub overall_match: f64,
    pub skills_match: f64,
    pub experience_match: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub needs_user_input: bool,
}

/// Error payload attached to non-2xx responses. The service reports either
/// a `message` or a FastAPI-style `detail` field.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
    pub detail: Option<String>,
}
