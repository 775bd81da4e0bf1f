use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use upload_flow::{
    ACCEPTED_EXTENSIONS, AnalysisFlow, AnalysisService, FlowSession, UploadSelection,
};

use crate::config::ClientConfig;
use crate::flows::{PrescriptionFlow, ReportFlow};

#[derive(Debug, Parser)]
#[command(
    name = "medscan",
    version,
    about = "Send medical reports and prescriptions to the analysis service and show the results"
)]
pub struct Cli {
    /// Analysis service base URL (overrides MEDSCAN_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides MEDSCAN_TIMEOUT_SECS)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Print the analysis payload as JSON instead of text panels
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a medical report (PDF, JPG or PNG)
    Report {
        file: PathBuf,
        /// Ask for health recommendations if abnormalities are found
        #[arg(long)]
        recommendations: bool,
    },
    /// Analyze a prescription (PDF, JPG or PNG)
    Prescription {
        file: PathBuf,
        /// Ask for detailed information about medicine uses
        #[arg(long)]
        medicine_uses: bool,
    },
}

/// What a command produced: text for stdout, or the message for the error box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(String),
}

pub async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<Outcome> {
    let config = config.with_overrides(cli.base_url, cli.timeout_secs)?;
    info!("Using analysis service at {}", config.base_url);

    let service: Arc<dyn AnalysisService> = Arc::new(config.build_service()?);

    match cli.command {
        Command::Report {
            file,
            recommendations,
        } => run_flow(ReportFlow, service, &file, recommendations, cli.json).await,
        Command::Prescription {
            file,
            medicine_uses,
        } => run_flow(PrescriptionFlow, service, &file, medicine_uses, cli.json).await,
    }
}

/// Pick the file, set the flag and submit once.
pub async fn run_flow<F>(
    flow: F,
    service: Arc<dyn AnalysisService>,
    file: &Path,
    flag: bool,
    as_json: bool,
) -> anyhow::Result<Outcome>
where
    F: AnalysisFlow,
    F::Output: Serialize,
{
    let selection = UploadSelection::from_path(file)
        .await
        .with_context(|| format!("Could not read {}", file.display()))?;

    if !selection.is_advised_type() {
        warn!(
            "{} is not one of .{}; submitting anyway",
            selection.file_name(),
            ACCEPTED_EXTENSIONS.join(", .")
        );
    }

    let session = FlowSession::new(flow, service);
    session.select_file(Some(selection));
    session.set_flag(flag);

    match session.submit().await {
        Ok(output) if as_json => Ok(Outcome::Success(format!(
            "{}\n",
            serde_json::to_string_pretty(&output)?
        ))),
        Ok(output) => Ok(Outcome::Success(session.flow().render(&output))),
        Err(e) => Ok(Outcome::Failure(e.to_string())),
    }
}

/// Inline error box shown instead of the result panels.
pub fn error_box(message: &str) -> String {
    let width = message.lines().map(|line| line.chars().count()).max().unwrap_or(0) + 2;
    let border = format!("+{}+", "-".repeat(width));
    let mut rendered = format!("{}\n", border);
    for line in message.lines() {
        rendered.push_str(&format!("| {:<w$} |\n", line, w = width - 2));
    }
    rendered.push_str(&border);
    rendered.push('\n');
    rendered
}
