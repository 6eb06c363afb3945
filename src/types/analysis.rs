// src/types/analysis.rs
//! Session-facing data model for the optimization wizard

use serde::{Deserialize, Serialize};

use crate::types::response::AnalyzeResponse;

/// A document selected by the user, exclusively owned by the session until
/// it is uploaded. Replacing it drops the previous buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The artifact produced by the generate call. Either a rendered document
/// or a structured data payload, depending on what the service returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Match analysis as held by the session, after clamping and reconciliation.
///
/// `needs_user_input` is only ever true when `missing_skills` is non-empty;
/// the conversion from the wire response enforces this regardless of the
/// flag the service sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_match: u8,
    pub skills_match: u8,
    pub experience_match: u8,
    pub recommendations: Vec<String>,
    pub missing_skills: Vec<String>,
    pub needs_user_input: bool,
}

impl From<AnalyzeResponse> for AnalysisResult {
    fn from(resp: AnalyzeResponse) -> Self {
        let needs_user_input = resp.needs_user_input && !resp.missing_skills.is_empty();
        Self {
            overall_match: clamp_percentage(resp.overall_match),
            skills_match: clamp_percentage(resp.skills_match),
            experience_match: clamp_percentage(resp.experience_match),
            recommendations: resp.recommendations,
            missing_skills: resp.missing_skills,
            needs_user_input,
        }
    }
}

/// An entry of the template catalog served by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

fn clamp_percentage(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}
