use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cv_optimizer::{
    utils, AnalysisClient, DocumentFile, EnvironmentConfig, Session, WizardFlow, WizardStep,
};

/// Run the CV optimization wizard end to end against the analysis service.
#[derive(Parser)]
#[command(name = "cvpilot", version, about)]
struct Cli {
    /// CV file to optimize (PDF or DOCX)
    #[arg(long)]
    cv: PathBuf,

    /// Text file containing the job description
    #[arg(long)]
    job_file: PathBuf,

    /// Directory the generated artifact is written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Confirm every missing skill the analysis reports
    #[arg(long)]
    confirm_all: bool,

    /// Render with this template (switches to the templated flow)
    #[arg(long)]
    template: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = EnvironmentConfig::load()?;
    info!("Analysis service: {}", config.service_url);

    let flow = if cli.template.is_some() {
        WizardFlow::Templated
    } else {
        config.flow
    };

    let client = AnalysisClient::new(config.service_url.clone(), config.timeout_secs)?;
    client
        .health_check()
        .await
        .context("Analysis service is not reachable")?;

    let mut session = Session::new(client, flow);

    // Step 1: upload
    let file_name = cli
        .cv
        .file_name()
        .and_then(|n| n.to_str())
        .context("CV path has no file name")?
        .to_string();
    let content_type = utils::content_type_for(&file_name)
        .with_context(|| format!("Unsupported CV format: {file_name}. Use PDF or DOCX"))?;
    let bytes = tokio::fs::read(&cli.cv)
        .await
        .with_context(|| format!("Failed to read CV file: {}", cli.cv.display()))?;

    session.select_document(DocumentFile::new(file_name, content_type, bytes))?;
    session.submit_document().await?;
    println!("✓ CV uploaded (id {})", session.document_id());

    // Step 2: analyze
    let job_description = tokio::fs::read_to_string(&cli.job_file)
        .await
        .with_context(|| format!("Failed to read job description: {}", cli.job_file.display()))?;
    session.set_job_description(job_description)?;
    session.submit_job_description().await?;

    let analysis = session.analysis().context("No analysis result")?.clone();
    println!(
        "✓ Analysis complete: overall {}%, skills {}%, experience {}%",
        analysis.overall_match, analysis.skills_match, analysis.experience_match
    );
    for recommendation in &analysis.recommendations {
        println!("  - {recommendation}");
    }

    // Step 3: confirm missing skills and generate
    let confirmed: Vec<usize> = if cli.confirm_all {
        (0..analysis.missing_skills.len()).collect()
    } else {
        Vec::new()
    };
    if !analysis.missing_skills.is_empty() {
        println!(
            "  Missing skills: {} (confirming {})",
            analysis.missing_skills.join(", "),
            confirmed.len()
        );
    }
    session.confirm_skills(&confirmed).await?;

    // Step 4: template selection (templated flow only)
    if session.current_step() == WizardStep::SelectTemplate {
        let template_id = match cli.template {
            Some(id) => id,
            None => {
                session.load_templates().await?;
                session
                    .templates()
                    .first()
                    .context("Service offers no templates")?
                    .id
                    .clone()
            }
        };
        session.select_template(template_id)?;
        session.generate_with_template().await?;
    }

    let artifact = session.artifact().context("No artifact generated")?;
    tokio::fs::create_dir_all(&cli.output_dir)
        .await
        .with_context(|| format!("Failed to create directory: {}", cli.output_dir.display()))?;
    let output_path = utils::output_file_path(&cli.output_dir, &artifact.file_name);
    tokio::fs::write(&output_path, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write artifact: {}", output_path.display()))?;

    println!("✓ Optimized CV written to {}", output_path.display());
    Ok(())
}
