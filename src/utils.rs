// src/utils.rs
use std::path::{Path, PathBuf};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Map a document filename to its MIME content type
pub fn content_type_for(filename: &str) -> Option<&'static str> {
    match get_file_extension(filename)?.as_str() {
        "pdf" => Some(PDF_CONTENT_TYPE),
        "docx" => Some(DOCX_CONTENT_TYPE),
        _ => None,
    }
}

/// Check whether a content type is accepted for upload
pub fn is_supported_content_type(content_type: &str) -> bool {
    content_type == PDF_CONTENT_TYPE || content_type == DOCX_CONTENT_TYPE
}

/// Default download name for a generated artifact, by content type
pub fn artifact_file_name(content_type: &str) -> &'static str {
    if content_type.starts_with(PDF_CONTENT_TYPE) {
        "optimized_cv.pdf"
    } else {
        "optimized_resume_data.json"
    }
}

/// Build a timestamped output file path for a generated artifact
pub fn output_file_path(base: &Path, artifact_name: &str) -> PathBuf {
    let (stem, ext) = match artifact_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (artifact_name, "bin"),
    };
    base.join(format!(
        "{}_{}.{}",
        stem,
        chrono::Utc::now().format("%Y%m%d_%H%M%S"),
        ext
    ))
}

/// Human-readable size in MiB for validation messages
pub fn format_mib(bytes: usize) -> String {
    format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
}
