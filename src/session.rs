// src/session.rs
//! Wizard session controller: step sequencing, the in-flight operation
//! guard, and the data carried between steps.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, WizardError};
use crate::service_client::AnalysisClient;
use crate::types::{AnalysisResult, Artifact, DocumentFile, TemplateInfo};
use crate::utils::{format_mib, is_supported_content_type};

pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;

/// The wizard's screen sequence. `ConfirmSkills` is entered only when the
/// analysis reports gaps the user must confirm; `SelectTemplate` exists only
/// in the templated flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    UploadDocument,
    EnterJobDescription,
    ReviewAnalysis,
    ConfirmSkills,
    SelectTemplate,
    Complete,
}

/// State of the single asynchronous operation a session may have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// Which variant of the wizard runs: `Standard` finishes at generation,
/// `Templated` adds template selection and a second generate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardFlow {
    #[default]
    Standard,
    Templated,
}

#[derive(Debug, Clone, PartialEq)]
struct SessionState {
    step: WizardStep,
    document: Option<DocumentFile>,
    document_id: String,
    job_description: String,
    analysis_id: String,
    analysis: Option<AnalysisResult>,
    confirmed_skills: Vec<String>,
    templates: Vec<TemplateInfo>,
    selected_template: Option<String>,
    artifact: Option<Artifact>,
    operation: OperationState,
    last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            step: WizardStep::UploadDocument,
            document: None,
            document_id: String::new(),
            job_description: String::new(),
            analysis_id: String::new(),
            analysis: None,
            confirmed_skills: Vec::new(),
            templates: Vec::new(),
            selected_template: None,
            artifact: None,
            operation: OperationState::Idle,
            last_error: None,
        }
    }
}

/// One wizard instance. Owns its inputs and the generated artifact
/// exclusively; not safe for concurrent invocation of two operations - the
/// pending guard rejects the second call instead of queueing it.
///
/// A failed external call leaves every field as it was before the call,
/// apart from `operation_state` and `last_error`. Retrying is always an
/// explicit re-invocation by the caller.
pub struct Session {
    client: AnalysisClient,
    flow: WizardFlow,
    state: SessionState,
}

// Client identity is irrelevant to session equality.
impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.flow == other.flow && self.state == other.state
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("flow", &self.flow)
            .field("step", &self.state.step)
            .field("operation", &self.state.operation)
            .finish()
    }
}

impl Session {
    pub fn new(client: AnalysisClient, flow: WizardFlow) -> Self {
        Self {
            client,
            flow,
            state: SessionState::default(),
        }
    }

    // ===== Derived state =====

    pub fn current_step(&self) -> WizardStep {
        self.state.step
    }

    pub fn operation_state(&self) -> OperationState {
        self.state.operation
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    pub fn flow(&self) -> WizardFlow {
        self.flow
    }

    pub fn document(&self) -> Option<&DocumentFile> {
        self.state.document.as_ref()
    }

    pub fn document_id(&self) -> &str {
        &self.state.document_id
    }

    pub fn job_description(&self) -> &str {
        &self.state.job_description
    }

    /// Whether the job description meets the minimum length for analysis.
    /// Drives submit-button enablement; `submit_job_description` enforces
    /// the same rule as a hard validation.
    pub fn job_description_ready(&self) -> bool {
        self.state.job_description.trim().chars().count() >= MIN_JOB_DESCRIPTION_CHARS
    }

    pub fn analysis_id(&self) -> &str {
        &self.state.analysis_id
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.state.analysis.as_ref()
    }

    pub fn confirmed_skills(&self) -> &[String] {
        &self.state.confirmed_skills
    }

    pub fn templates(&self) -> &[TemplateInfo] {
        &self.state.templates
    }

    pub fn selected_template(&self) -> Option<&str> {
        self.state.selected_template.as_deref()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.state.artifact.as_ref()
    }

    // ===== Operations =====

    /// Validate and take ownership of a document. Local only; a rejected
    /// file leaves the previously selected document in place.
    pub fn select_document(&mut self, file: DocumentFile) -> Result<()> {
        self.ensure_not_pending("select_document")?;
        self.ensure_step(WizardStep::UploadDocument, "select_document")?;

        if file.bytes.is_empty() {
            return Err(WizardError::Validation("selected file is empty".to_string()));
        }
        if !is_supported_content_type(&file.content_type) {
            return Err(WizardError::Validation(format!(
                "unsupported content type: {}. Only PDF and DOCX are accepted",
                file.content_type
            )));
        }
        if file.size() > MAX_DOCUMENT_BYTES {
            return Err(WizardError::Validation(format!(
                "file is {}, limit is {}",
                format_mib(file.size()),
                format_mib(MAX_DOCUMENT_BYTES)
            )));
        }

        info!("Document selected: {} ({})", file.file_name, format_mib(file.size()));
        // Replacing drops the previous buffer.
        self.state.document = Some(file);
        Ok(())
    }

    /// Upload the selected document; on success the session advances to the
    /// job description step.
    pub async fn submit_document(&mut self) -> Result<()> {
        self.ensure_not_pending("submit_document")?;
        self.ensure_step(WizardStep::UploadDocument, "submit_document")?;
        let document = self
            .state
            .document
            .clone()
            .ok_or_else(|| WizardError::State("no document selected".to_string()))?;

        self.state.operation = OperationState::Pending;
        match self.client.upload_document(&document).await {
            Ok(resp) => {
                info!("Document uploaded, id {}", resp.cv_id);
                self.state.document_id = resp.cv_id;
                self.advance(WizardStep::EnterJobDescription);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Store the job description text. Local mutation; length is only
    /// enforced when submitting.
    pub fn set_job_description(&mut self, text: impl Into<String>) -> Result<()> {
        self.ensure_not_pending("set_job_description")?;
        self.ensure_step(WizardStep::EnterJobDescription, "set_job_description")?;
        self.state.job_description = text.into();
        Ok(())
    }

    /// Run the analysis. On success the session holds the reconciled result
    /// and sits on `ConfirmSkills` when follow-up is required, otherwise on
    /// the gap-free `ReviewAnalysis` screen.
    pub async fn submit_job_description(&mut self) -> Result<()> {
        self.ensure_not_pending("submit_job_description")?;
        self.ensure_step(WizardStep::EnterJobDescription, "submit_job_description")?;
        if self.state.document_id.is_empty() {
            return Err(WizardError::State(
                "no uploaded document to analyze against".to_string(),
            ));
        }
        if !self.job_description_ready() {
            return Err(WizardError::Validation(format!(
                "job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters"
            )));
        }

        let cv_id = self.state.document_id.clone();
        let job_description = self.state.job_description.clone();

        self.state.operation = OperationState::Pending;
        match self.client.analyze(&cv_id, &job_description).await {
            Ok(resp) => {
                self.state.analysis_id = resp.analysis_id.clone();
                let analysis = AnalysisResult::from(resp);
                let next = if analysis.needs_user_input {
                    WizardStep::ConfirmSkills
                } else {
                    WizardStep::ReviewAnalysis
                };
                info!(
                    "Analysis {} complete: {}% overall, {} missing skills",
                    self.state.analysis_id,
                    analysis.overall_match,
                    analysis.missing_skills.len()
                );
                self.state.analysis = Some(analysis);
                self.advance(next);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Confirm a subset of the reported missing skills by index and run the
    /// generate step. Out-of-range indices are ignored. Accepted from the
    /// gap-free review screen as well, with an empty confirmation set.
    pub async fn confirm_skills(&mut self, selected_indices: &[usize]) -> Result<()> {
        self.ensure_not_pending("confirm_skills")?;
        if !matches!(
            self.state.step,
            WizardStep::ReviewAnalysis | WizardStep::ConfirmSkills
        ) {
            return Err(WizardError::State(format!(
                "confirm_skills not valid at step {:?}",
                self.state.step
            )));
        }
        let analysis = self
            .state
            .analysis
            .as_ref()
            .ok_or_else(|| WizardError::State("no analysis available".to_string()))?;

        let confirmed: Vec<String> = analysis
            .missing_skills
            .iter()
            .enumerate()
            .filter(|(i, _)| selected_indices.contains(i))
            .map(|(_, skill)| skill.clone())
            .collect();

        let analysis_id = self.state.analysis_id.clone();
        self.state.operation = OperationState::Pending;
        match self
            .client
            .generate_resume(&analysis_id, &confirmed, None)
            .await
        {
            Ok(artifact) => {
                info!(
                    "Generated artifact {} ({} bytes)",
                    artifact.file_name,
                    artifact.bytes.len()
                );
                self.state.confirmed_skills = confirmed;
                self.state.artifact = Some(artifact);
                let next = match self.flow {
                    WizardFlow::Standard => WizardStep::Complete,
                    WizardFlow::Templated => WizardStep::SelectTemplate,
                };
                self.advance(next);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Fetch the template catalog (templated flow only).
    pub async fn load_templates(&mut self) -> Result<()> {
        self.ensure_not_pending("load_templates")?;
        self.ensure_templated("load_templates")?;
        self.ensure_step(WizardStep::SelectTemplate, "load_templates")?;

        self.state.operation = OperationState::Pending;
        match self.client.list_templates().await {
            Ok(templates) => {
                self.state.templates = templates;
                self.state.operation = OperationState::Succeeded;
                self.state.last_error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Pick a template id. Local selection is unconstrained; the id comes
    /// from the externally supplied catalog.
    pub fn select_template(&mut self, template_id: impl Into<String>) -> Result<()> {
        self.ensure_not_pending("select_template")?;
        self.ensure_templated("select_template")?;
        self.ensure_step(WizardStep::SelectTemplate, "select_template")?;
        self.state.selected_template = Some(template_id.into());
        Ok(())
    }

    /// Re-run generation with the chosen template; the resulting artifact
    /// replaces the one produced at skill confirmation.
    pub async fn generate_with_template(&mut self) -> Result<()> {
        self.ensure_not_pending("generate_with_template")?;
        self.ensure_templated("generate_with_template")?;
        self.ensure_step(WizardStep::SelectTemplate, "generate_with_template")?;
        let template_id = self
            .state
            .selected_template
            .clone()
            .ok_or_else(|| WizardError::State("no template selected".to_string()))?;

        let analysis_id = self.state.analysis_id.clone();
        let confirmed = self.state.confirmed_skills.clone();

        self.state.operation = OperationState::Pending;
        match self
            .client
            .generate_resume(&analysis_id, &confirmed, Some(&template_id))
            .await
        {
            Ok(artifact) => {
                info!("Generated templated artifact with {}", template_id);
                self.state.artifact = Some(artifact);
                self.advance(WizardStep::Complete);
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Discard everything and start over at document upload. The HTTP
    /// client and flow configuration are kept.
    pub fn reset(&mut self) {
        info!("Session reset");
        self.state = SessionState::default();
    }

    // ===== Guards =====

    fn ensure_not_pending(&self, operation: &str) -> Result<()> {
        if self.state.operation == OperationState::Pending {
            return Err(WizardError::State(format!(
                "{operation} invoked while another operation is in flight"
            )));
        }
        Ok(())
    }

    fn ensure_step(&self, expected: WizardStep, operation: &str) -> Result<()> {
        if self.state.step != expected {
            return Err(WizardError::State(format!(
                "{operation} not valid at step {:?}",
                self.state.step
            )));
        }
        Ok(())
    }

    fn ensure_templated(&self, operation: &str) -> Result<()> {
        if self.flow != WizardFlow::Templated {
            return Err(WizardError::State(format!(
                "{operation} is only available in the templated flow"
            )));
        }
        Ok(())
    }

    fn advance(&mut self, next: WizardStep) {
        info!("Step {:?} -> {:?}", self.state.step, next);
        self.state.step = next;
        self.state.operation = OperationState::Succeeded;
        self.state.last_error = None;
    }

    fn fail(&mut self, err: WizardError) -> WizardError {
        self.state.operation = OperationState::Failed;
        self.state.last_error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::PDF_CONTENT_TYPE;
    use mockito::{Matcher, Server, ServerGuard};

    fn session(url: String, flow: WizardFlow) -> Session {
        Session::new(AnalysisClient::new(url, 5).unwrap(), flow)
    }

    fn pdf(bytes: Vec<u8>) -> DocumentFile {
        DocumentFile::new("resume.pdf", PDF_CONTENT_TYPE, bytes)
    }

    fn analysis_fixture(missing: Vec<&str>) -> AnalysisResult {
        AnalysisResult {
            overall_match: 85,
            skills_match: 78,
            experience_match: 92,
            recommendations: vec!["Highlight project management".to_string()],
            needs_user_input: !missing.is_empty(),
            missing_skills: missing.into_iter().map(String::from).collect(),
        }
    }

    async fn mock_upload(server: &mut ServerGuard, cv_id: &str) -> mockito::Mock {
        server
            .mock("POST", "/api/upload-cv")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"cv_id":"{cv_id}","filename":"resume.pdf","message":null}}"#))
            .create_async()
            .await
    }

    async fn mock_analyze(server: &mut ServerGuard, body: &str) -> mockito::Mock {
        server
            .mock("POST", "/api/analyze")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    async fn mock_generate(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/api/generate-resume")
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"%PDF-1.4 generated".to_vec())
            .create_async()
            .await
    }

    const JOB_TEXT: &str =
        "Senior data engineer with Docker, Kubernetes and strong Python skills required.";

    // ===== Local validation =====

    #[test]
    fn test_select_document_rejects_oversize_file() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        s.select_document(pdf(vec![0u8; 1024])).unwrap();

        let err = s
            .select_document(pdf(vec![0u8; MAX_DOCUMENT_BYTES + 1]))
            .unwrap_err();
        assert!(err.is_validation());
        // Previous selection is untouched.
        assert_eq!(s.document().unwrap().size(), 1024);
    }

    #[test]
    fn test_select_document_rejects_unknown_content_type() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        let err = s
            .select_document(DocumentFile::new("resume.txt", "text/plain", vec![1, 2]))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(s.document().is_none());
    }

    #[test]
    fn test_select_document_rejects_empty_file() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        let err = s.select_document(pdf(vec![])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_select_document_accepts_exactly_five_mib() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        s.select_document(pdf(vec![0u8; MAX_DOCUMENT_BYTES])).unwrap();
        assert!(s.document().is_some());
    }

    #[test]
    fn test_replacing_document_releases_previous_one() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        s.select_document(pdf(vec![1; 10])).unwrap();
        s.select_document(DocumentFile::new(
            "other.pdf",
            PDF_CONTENT_TYPE,
            vec![2; 20],
        ))
        .unwrap();
        assert_eq!(s.document().unwrap().file_name, "other.pdf");
        assert_eq!(s.document().unwrap().size(), 20);
    }

    #[tokio::test]
    async fn test_short_job_description_fails_validation_without_network() {
        let mut server = Server::new_async().await;
        let analyze = server
            .mock("POST", "/api/analyze")
            .expect(0)
            .create_async()
            .await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.state.step = WizardStep::EnterJobDescription;
        s.state.document_id = "cv-1".to_string();
        s.set_job_description("too short").unwrap();
        assert!(!s.job_description_ready());

        let err = s.submit_job_description().await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(s.current_step(), WizardStep::EnterJobDescription);
        analyze.assert_async().await;
    }

    // ===== Pending guard =====

    #[tokio::test]
    async fn test_operations_fail_fast_while_pending() {
        let mut server = Server::new_async().await;
        let upload = server
            .mock("POST", "/api/upload-cv")
            .expect(0)
            .create_async()
            .await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.select_document(pdf(vec![1])).unwrap();
        s.state.operation = OperationState::Pending;

        assert!(s.select_document(pdf(vec![2])).unwrap_err().is_state());
        assert!(s.submit_document().await.unwrap_err().is_state());
        assert!(s.set_job_description("x").unwrap_err().is_state());
        assert!(s.confirm_skills(&[0]).await.unwrap_err().is_state());
        upload.assert_async().await;
    }

    // ===== Step preconditions =====

    #[tokio::test]
    async fn test_submit_document_without_selection_is_state_error() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        let err = s.submit_document().await.unwrap_err();
        assert!(err.is_state());
    }

    #[tokio::test]
    async fn test_analyze_before_upload_is_state_error() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        s.state.step = WizardStep::EnterJobDescription;
        s.state.job_description = JOB_TEXT.to_string();

        let err = s.submit_job_description().await.unwrap_err();
        assert!(err.is_state());
    }

    #[test]
    fn test_set_job_description_at_wrong_step_is_state_error() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        let err = s.set_job_description(JOB_TEXT).unwrap_err();
        assert!(err.is_state());
    }

    #[test]
    fn test_template_operations_rejected_in_standard_flow() {
        let mut s = session("http://unused.invalid".to_string(), WizardFlow::Standard);
        s.state.step = WizardStep::SelectTemplate;
        assert!(s.select_template("template1").unwrap_err().is_state());
    }

    // ===== Reconciliation =====

    #[tokio::test]
    async fn test_empty_missing_skills_skips_confirmation_step() {
        let mut server = Server::new_async().await;
        // Service claims follow-up is needed but reports no gaps.
        mock_analyze(
            &mut server,
            r#"{"analysis_id":"a-1","overall_match":90,"skills_match":88,"experience_match":95,
                "recommendations":[],"missing_skills":[],"needs_user_input":true}"#,
        )
        .await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.state.step = WizardStep::EnterJobDescription;
        s.state.document_id = "cv-1".to_string();
        s.set_job_description(JOB_TEXT).unwrap();
        s.submit_job_description().await.unwrap();

        assert_eq!(s.current_step(), WizardStep::ReviewAnalysis);
        assert!(!s.analysis().unwrap().needs_user_input);
    }

    // ===== Skill index mapping =====

    #[tokio::test]
    async fn test_confirm_skills_maps_indices_in_order() {
        let mut server = Server::new_async().await;
        let generate = server
            .mock("POST", "/api/generate-resume")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "analysis_id": "a-1",
                "confirmed_skills": ["Docker", "GraphQL"],
            })))
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"pdf".to_vec())
            .create_async()
            .await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.state.step = WizardStep::ConfirmSkills;
        s.state.analysis_id = "a-1".to_string();
        s.state.analysis = Some(analysis_fixture(vec!["Docker", "Kubernetes", "GraphQL"]));

        s.confirm_skills(&[0, 2]).await.unwrap();
        assert_eq!(s.confirmed_skills(), ["Docker", "GraphQL"]);
        assert_eq!(s.current_step(), WizardStep::Complete);
        generate.assert_async().await;
    }

    #[tokio::test]
    async fn test_confirm_skills_ignores_out_of_range_indices() {
        let mut server = Server::new_async().await;
        mock_generate(&mut server).await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.state.step = WizardStep::ConfirmSkills;
        s.state.analysis_id = "a-1".to_string();
        s.state.analysis = Some(analysis_fixture(vec!["Docker"]));

        s.confirm_skills(&[0, 7, 42]).await.unwrap();
        assert_eq!(s.confirmed_skills(), ["Docker"]);
    }

    // ===== Failure leaves the session untouched =====

    #[tokio::test]
    async fn test_failed_analysis_preserves_session_fields() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/analyze")
            .with_status(500)
            .with_body(r#"{"detail":"backend exploded"}"#)
            .create_async()
            .await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.state.step = WizardStep::EnterJobDescription;
        s.state.document_id = "cv-1".to_string();
        s.set_job_description(JOB_TEXT).unwrap();

        let err = s.submit_job_description().await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("backend exploded"));

        assert_eq!(s.current_step(), WizardStep::EnterJobDescription);
        assert_eq!(s.operation_state(), OperationState::Failed);
        assert!(s.analysis().is_none());
        assert!(s.analysis_id().is_empty());
        assert_eq!(s.last_error().unwrap(), err.to_string());
        assert_eq!(s.job_description(), JOB_TEXT);
    }

    #[tokio::test]
    async fn test_failed_operation_can_be_retried() {
        let mut server = Server::new_async().await;
        let failing = server
            .mock("POST", "/api/upload-cv")
            .with_status(503)
            .with_body(r#"{"detail":"try later"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.select_document(pdf(vec![1])).unwrap();
        assert!(s.submit_document().await.is_err());
        failing.assert_async().await;

        mock_upload(&mut server, "cv-1").await;
        s.submit_document().await.unwrap();
        assert_eq!(s.current_step(), WizardStep::EnterJobDescription);
        assert_eq!(s.document_id(), "cv-1");
    }

    // ===== End to end =====

    #[tokio::test]
    async fn test_standard_flow_end_to_end() {
        let mut server = Server::new_async().await;
        mock_upload(&mut server, "cv-1").await;
        mock_analyze(
            &mut server,
            r#"{"analysis_id":"a-1","overall_match":85,"skills_match":78,"experience_match":92,
                "recommendations":["Highlight project management"],
                "missing_skills":["Docker"],"needs_user_input":true}"#,
        )
        .await;
        mock_generate(&mut server).await;

        let mut s = session(server.url(), WizardFlow::Standard);

        s.select_document(pdf(vec![0u8; 2048])).unwrap();
        s.submit_document().await.unwrap();
        assert_eq!(s.current_step(), WizardStep::EnterJobDescription);
        assert_eq!(s.document_id(), "cv-1");

        s.set_job_description(JOB_TEXT).unwrap();
        s.submit_job_description().await.unwrap();
        assert_eq!(s.current_step(), WizardStep::ConfirmSkills);
        assert_eq!(s.analysis().unwrap().missing_skills, ["Docker"]);

        s.confirm_skills(&[0]).await.unwrap();
        assert_eq!(s.current_step(), WizardStep::Complete);
        let artifact = s.artifact().unwrap();
        assert_eq!(artifact.content_type, "application/pdf");
        assert!(!artifact.bytes.is_empty());
        assert_eq!(s.operation_state(), OperationState::Succeeded);
    }

    #[tokio::test]
    async fn test_templated_flow_runs_second_generate() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/templates")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"template1","name":"Classic","description":null,"thumbnail_url":null}]"#)
            .create_async()
            .await;
        let first_generate = server
            .mock("POST", "/api/generate-resume")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "confirmed_skills": ["Docker"],
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cv_data":{}}"#)
            .create_async()
            .await;
        let templated_generate = server
            .mock("POST", "/api/generate-resume")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "template_id": "template1",
            })))
            .with_status(200)
            .with_header("content-type", "application/pdf")
            .with_body(b"%PDF final".to_vec())
            .create_async()
            .await;

        let mut s = session(server.url(), WizardFlow::Templated);
        s.state.step = WizardStep::ConfirmSkills;
        s.state.analysis_id = "a-1".to_string();
        s.state.analysis = Some(analysis_fixture(vec!["Docker"]));

        s.confirm_skills(&[0]).await.unwrap();
        assert_eq!(s.current_step(), WizardStep::SelectTemplate);
        first_generate.assert_async().await;

        s.load_templates().await.unwrap();
        assert_eq!(s.templates().len(), 1);

        assert!(s.generate_with_template().await.unwrap_err().is_state());

        s.select_template("template1").unwrap();
        s.generate_with_template().await.unwrap();
        assert_eq!(s.current_step(), WizardStep::Complete);
        assert_eq!(s.artifact().unwrap().content_type, "application/pdf");
        templated_generate.assert_async().await;
    }

    // ===== Reset =====

    #[tokio::test]
    async fn test_reset_restores_fresh_session() {
        let mut server = Server::new_async().await;
        mock_upload(&mut server, "cv-1").await;

        let mut s = session(server.url(), WizardFlow::Standard);
        s.select_document(pdf(vec![1, 2, 3])).unwrap();
        s.submit_document().await.unwrap();
        assert_ne!(s, session(server.url(), WizardFlow::Standard));

        s.reset();
        assert_eq!(s, session(server.url(), WizardFlow::Standard));
        assert_eq!(s.current_step(), WizardStep::UploadDocument);
        assert_eq!(s.operation_state(), OperationState::Idle);
        assert!(s.document().is_none());
        assert!(s.document_id().is_empty());
    }
}
