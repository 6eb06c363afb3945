//! Session controller for the CV optimization wizard.
//!
//! Drives the upload -> job description -> analysis -> skill confirmation ->
//! generation flow against an external analysis service. All parsing,
//! scoring and rendering happens in that service; this crate owns the step
//! sequencing, validation, and the shape of the exchanged data.

pub mod environment;
pub mod error;
pub mod service_client;
pub mod session;
pub mod types;
pub mod utils;

pub use environment::EnvironmentConfig;
pub use error::WizardError;
pub use service_client::AnalysisClient;
pub use session::{OperationState, Session, WizardFlow, WizardStep};
pub use types::{AnalysisResult, Artifact, DocumentFile, TemplateInfo};
