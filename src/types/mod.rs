// src/types/mod.rs
//! Data structures exchanged between the wizard session and the analysis service

pub mod analysis;
pub mod response;

pub use analysis::{AnalysisResult, Artifact, DocumentFile, TemplateInfo};
